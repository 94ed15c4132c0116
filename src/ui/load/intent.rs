use crate::ui::mvi::Intent;
use crate::ui::UserMessage;

#[derive(Debug, Clone)]
pub enum LoadIntent {
    /// A repository call was issued.
    Start,
    Succeed,
    Fail { message: UserMessage },
}

impl Intent for LoadIntent {}
