//! Edit-profile screen.

use crate::context::AppContext;
use crate::error::ActionError;
use crate::model::{ChangeRecord, ProfileUpdate, User};
use crate::reactive::{Event, Observable};
use crate::ui::screen::ScreenCore;
use crate::ui::UserMessage;

pub struct EditProfileViewState {
    core: ScreenCore,
    name: Observable<String>,
    bio: Observable<Option<String>>,
    profile_pic_url: Observable<Option<String>>,
    loading: Observable<bool>,
    saving: Observable<bool>,
    profile_saved: Observable<Event<User>>,
}

impl EditProfileViewState {
    /// Fields start from the stored user; `load` fills in the bio.
    pub fn new(context: AppContext) -> Result<Self, ActionError> {
        let core = ScreenCore::new("edit_profile", context);
        let user = core.require_user()?;
        Ok(Self {
            core,
            name: Observable::with_value(user.name),
            bio: Observable::with_value(None),
            profile_pic_url: Observable::with_value(user.profile_pic_url),
            loading: Observable::with_value(false),
            saving: Observable::with_value(false),
            profile_saved: Observable::new(),
        })
    }

    /// Fetch the current profile into the fields.
    pub fn load(&self) {
        let user = match self.core.require_user() {
            Ok(user) => user,
            Err(error) => {
                self.core.report(&error);
                return;
            }
        };

        self.loading.set(true);
        let repository = self.core.context().repository();
        let (core, name, bio, profile_pic_url, loading) = (
            self.core.clone(),
            self.name.clone(),
            self.bio.clone(),
            self.profile_pic_url.clone(),
            self.loading.clone(),
        );
        self.core.launch(
            "fetch_profile",
            async move { repository.fetch_profile(&user).await },
            move |result| {
                match result {
                    Ok(profile) => {
                        name.set_if_changed(profile.name);
                        bio.set_if_changed(profile.bio);
                        profile_pic_url.set_if_changed(profile.profile_pic_url);
                    }
                    Err(error) => core.report(&error.into()),
                }
                loading.set(false);
            },
        );
    }

    pub fn on_name_change(&self, name: impl Into<String>) {
        self.name.set(name.into());
    }

    pub fn on_bio_change(&self, bio: impl Into<String>) {
        let bio = bio.into();
        self.bio.set((!bio.is_empty()).then_some(bio));
    }

    /// A new profile picture finished uploading.
    pub fn on_profile_pic_uploaded(&self, url: impl Into<String>) {
        self.profile_pic_url.set(Some(url.into()));
    }

    /// Save the fields, store the updated user and announce the changed
    /// fields to the other screens.
    pub fn on_save(&self) {
        let user = match self.core.precheck() {
            Ok(user) => user,
            Err(error) => {
                self.core.report(&error);
                return;
            }
        };
        let update = ProfileUpdate {
            name: self.name.get().unwrap_or_default(),
            bio: self.bio.get().flatten(),
            profile_pic_url: self.profile_pic_url.get().flatten(),
        };

        self.saving.set(true);
        let repository = self.core.context().repository();
        let (core, saving, profile_saved) = (
            self.core.clone(),
            self.saving.clone(),
            self.profile_saved.clone(),
        );
        let previous = user.clone();
        self.core.launch(
            "update_profile",
            async move { repository.update_profile(&user, &update).await },
            move |result| {
                match result {
                    Ok(profile) => {
                        let updated = User {
                            name: profile.name,
                            profile_pic_url: profile.profile_pic_url,
                            ..previous.clone()
                        };
                        core.context().credentials().save_current_user(updated.clone());
                        announce(&core, &previous, &updated);
                        core.show_message(UserMessage::ProfileSaved);
                        profile_saved.fire(updated);
                    }
                    Err(error) => core.report(&error.into()),
                }
                saving.set(false);
            },
        );
    }

    pub fn core(&self) -> &ScreenCore {
        &self.core
    }

    pub fn name(&self) -> &Observable<String> {
        &self.name
    }

    pub fn bio(&self) -> &Observable<Option<String>> {
        &self.bio
    }

    pub fn profile_pic_url(&self) -> &Observable<Option<String>> {
        &self.profile_pic_url
    }

    pub fn loading(&self) -> &Observable<bool> {
        &self.loading
    }

    pub fn saving(&self) -> &Observable<bool> {
        &self.saving
    }

    pub fn profile_saved(&self) -> &Observable<Event<User>> {
        &self.profile_saved
    }
}

/// Publish a record for every creator field that changed.
fn announce(core: &ScreenCore, previous: &User, updated: &User) {
    let bus = core.context().bus();
    if previous.name != updated.name {
        bus.publish(ChangeRecord::NameChanged {
            user_id: updated.id.clone(),
            name: updated.name.clone(),
        });
    }
    if previous.profile_pic_url != updated.profile_pic_url {
        if let Some(url) = &updated.profile_pic_url {
            bus.publish(ChangeRecord::ProfileImageChanged {
                user_id: updated.id.clone(),
                profile_pic_url: url.clone(),
            });
        }
    }
}

impl Drop for EditProfileViewState {
    fn drop(&mut self) {
        self.core.teardown();
    }
}
