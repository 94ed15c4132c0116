/// A message a screen surfaces to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserMessage {
    NoConnectivity,
    ServerUnreachable,
    SessionExpired,
    ServerError { status: u16, message: String },
    PostDeleted,
    ProfileSaved,
}

impl std::fmt::Display for UserMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserMessage::NoConnectivity => write!(f, "No internet connection"),
            UserMessage::ServerUnreachable => write!(f, "Could not reach the server"),
            UserMessage::SessionExpired => write!(f, "Your session has expired, please sign in again"),
            UserMessage::ServerError { status, message } if message.is_empty() => {
                write!(f, "Server error ({})", status)
            }
            UserMessage::ServerError { message, .. } => write!(f, "{}", message),
            UserMessage::PostDeleted => write!(f, "Post deleted"),
            UserMessage::ProfileSaved => write!(f, "Profile saved"),
        }
    }
}
