//! Signup screen.

use crate::context::AppContext;
use crate::model::validation::{all_passed, status_for, validate_signup_fields};
use crate::model::{Field, FieldStatus, Validation};
use crate::reactive::{map, Derived, Event, Observable};
use crate::ui::screen::ScreenCore;

pub struct SignupViewState {
    core: ScreenCore,
    email: Observable<String>,
    password: Observable<String>,
    name: Observable<String>,
    validations: Observable<Vec<Validation>>,
    email_validation: Derived<FieldStatus>,
    password_validation: Derived<FieldStatus>,
    name_validation: Derived<FieldStatus>,
    signing_up: Observable<bool>,
    launch_main: Observable<Event<()>>,
    launch_login: Observable<Event<()>>,
}

fn field_status(validations: &Observable<Vec<Validation>>, field: Field) -> Derived<FieldStatus> {
    map(validations, move |results: &Vec<Validation>| status_for(results, field))
}

impl SignupViewState {
    pub fn new(context: AppContext) -> Self {
        // Every field reads Unknown until the first submit.
        let validations = Observable::with_value(Vec::new());
        Self {
            core: ScreenCore::new("signup", context),
            email: Observable::new(),
            password: Observable::new(),
            name: Observable::new(),
            email_validation: field_status(&validations, Field::Email),
            password_validation: field_status(&validations, Field::Password),
            name_validation: field_status(&validations, Field::Name),
            validations,
            signing_up: Observable::with_value(false),
            launch_main: Observable::new(),
            launch_login: Observable::new(),
        }
    }

    pub fn on_email_change(&self, email: impl Into<String>) {
        self.email.set(email.into());
    }

    pub fn on_password_change(&self, password: impl Into<String>) {
        self.password.set(password.into());
    }

    pub fn on_name_change(&self, name: impl Into<String>) {
        self.name.set(name.into());
    }

    pub fn on_login_clicked(&self) {
        self.launch_login.fire(());
    }

    /// Validate every field; sign up only when all of them pass.
    pub fn on_signup(&self) {
        let email = self.email.get().unwrap_or_default();
        let password = self.password.get().unwrap_or_default();
        let name = self.name.get().unwrap_or_default();

        let validations = validate_signup_fields(&email, &password, &name);
        self.validations.set(validations.clone());
        if !all_passed(&validations) {
            tracing::debug!(?validations, "signup blocked by validation");
            return;
        }
        if let Err(error) = self.core.ensure_connected() {
            self.core.report(&error);
            return;
        }

        self.signing_up.set(true);
        let repository = self.core.context().repository();
        let (core, signing_up, launch_main) = (
            self.core.clone(),
            self.signing_up.clone(),
            self.launch_main.clone(),
        );
        self.core.launch(
            "signup",
            async move { repository.signup(&email, &password, &name).await },
            move |result| {
                match result {
                    Ok(user) => {
                        tracing::info!(user_id = %user.id, "signed up");
                        core.context().credentials().save_current_user(user);
                        signing_up.set(false);
                        launch_main.fire(());
                    }
                    Err(error) => {
                        core.report(&error.into());
                        signing_up.set(false);
                    }
                }
            },
        );
    }

    pub fn core(&self) -> &ScreenCore {
        &self.core
    }

    pub fn email(&self) -> &Observable<String> {
        &self.email
    }

    pub fn password(&self) -> &Observable<String> {
        &self.password
    }

    pub fn name(&self) -> &Observable<String> {
        &self.name
    }

    pub fn email_validation(&self) -> &Derived<FieldStatus> {
        &self.email_validation
    }

    pub fn password_validation(&self) -> &Derived<FieldStatus> {
        &self.password_validation
    }

    pub fn name_validation(&self) -> &Derived<FieldStatus> {
        &self.name_validation
    }

    pub fn signing_up(&self) -> &Observable<bool> {
        &self.signing_up
    }

    pub fn launch_main(&self) -> &Observable<Event<()>> {
        &self.launch_main
    }

    pub fn launch_login(&self) -> &Observable<Event<()>> {
        &self.launch_login
    }
}

impl Drop for SignupViewState {
    fn drop(&mut self) {
        self.core.teardown();
    }
}
