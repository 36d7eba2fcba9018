//! New-user form and its field validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::data::{Role, User};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub const NAME_REQUIRED: &str = "Имя обязательно";
pub const NAME_TOO_SHORT: &str = "Минимум 3 символа";
pub const EMAIL_REQUIRED: &str = "Email обязателен";
pub const EMAIL_INVALID: &str = "Некорректный email";
pub const EMAIL_TAKEN: &str = "Email существует";

const MIN_NAME_CHARS: usize = 3;

/// Loose `local@domain.tld` check.
pub fn validate_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Which field of the form has input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateField {
    #[default]
    Name,
    Email,
    Role,
    WelcomeEmail,
}

impl CreateField {
    pub fn next(self) -> Self {
        match self {
            CreateField::Name => CreateField::Email,
            CreateField::Email => CreateField::Role,
            CreateField::Role => CreateField::WelcomeEmail,
            CreateField::WelcomeEmail => CreateField::Name,
        }
    }
}

/// Field-level messages; `None` means the field passed its last check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// Create buffer for the "add user" modal.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateForm {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub send_welcome_email: bool,
    pub errors: FieldErrors,
    pub focus: CreateField,
}

impl Default for CreateForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: Role::Standard,
            send_welcome_email: true,
            errors: FieldErrors::default(),
            focus: CreateField::Name,
        }
    }
}

impl CreateForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate_name(&mut self) {
        let name = self.name.trim();
        self.errors.name = if name.is_empty() {
            Some(NAME_REQUIRED.to_string())
        } else if name.chars().count() < MIN_NAME_CHARS {
            Some(NAME_TOO_SHORT.to_string())
        } else {
            None
        };
    }

    /// Checks presence, shape, and uniqueness against `existing`.
    ///
    /// Uniqueness compares trimmed addresses case-insensitively.
    pub fn validate_email(&mut self, existing: &[User]) {
        let email = self.email.trim();
        let lowered = email.to_lowercase();
        self.errors.email = if email.is_empty() {
            Some(EMAIL_REQUIRED.to_string())
        } else if !validate_email(email) {
            Some(EMAIL_INVALID.to_string())
        } else if existing
            .iter()
            .any(|u| u.email.trim().to_lowercase() == lowered)
        {
            Some(EMAIL_TAKEN.to_string())
        } else {
            None
        };
    }

    pub fn validate(&mut self, existing: &[User]) {
        self.validate_name();
        self.validate_email(existing);
    }

    /// Whether the form may be submitted given the last validation run.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && validate_email(self.email.trim())
            && self.errors.is_empty()
    }

    /// Builds the record to persist, with `id` assigned by the caller.
    pub fn to_user(&self, id: u64) -> User {
        User::new(id, self.name.trim(), self.email.trim(), self.role)
    }

    pub fn append_input_char(&mut self, c: char) {
        match self.focus {
            CreateField::Name => self.name.push(c),
            CreateField::Email => self.email.push(c),
            CreateField::Role | CreateField::WelcomeEmail => {}
        }
    }

    /// Returns `true` if a character was removed.
    pub fn pop_input_char(&mut self) -> bool {
        match self.focus {
            CreateField::Name => self.name.pop().is_some(),
            CreateField::Email => self.email.pop().is_some(),
            CreateField::Role | CreateField::WelcomeEmail => false,
        }
    }

    /// Toggles or cycles the focused non-text field.
    pub fn toggle_focused(&mut self) {
        match self.focus {
            CreateField::Role => self.role = self.role.next(),
            CreateField::WelcomeEmail => self.send_welcome_email = !self.send_welcome_email,
            CreateField::Name | CreateField::Email => {}
        }
    }

    /// Moves focus on, validating the field being left.
    pub fn focus_next(&mut self, existing: &[User]) {
        match self.focus {
            CreateField::Name => self.validate_name(),
            CreateField::Email => self.validate_email(existing),
            _ => {}
        }
        self.focus = self.focus.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> Vec<User> {
        vec![User::new(1, "Taken", "taken@example.com", Role::Admin)]
    }

    #[test]
    fn test_new_default_values() {
        let form = CreateForm::new();
        assert_eq!(form.role, Role::Standard);
        assert!(form.send_welcome_email);
        assert!(form.errors.is_empty());
        assert!(!form.is_valid());
    }

    #[test]
    fn test_name_validation_messages() {
        let mut form = CreateForm::new();
        form.name = "   ".into();
        form.validate_name();
        assert_eq!(form.errors.name.as_deref(), Some(NAME_REQUIRED));

        form.name = " Ян ".into();
        form.validate_name();
        assert_eq!(form.errors.name.as_deref(), Some(NAME_TOO_SHORT));

        form.name = "Яна".into();
        form.validate_name();
        assert_eq!(form.errors.name, None);
    }

    #[test]
    fn test_email_validation_messages() {
        let users = existing();
        let mut form = CreateForm::new();

        form.validate_email(&users);
        assert_eq!(form.errors.email.as_deref(), Some(EMAIL_REQUIRED));

        form.email = "not-an-email".into();
        form.validate_email(&users);
        assert_eq!(form.errors.email.as_deref(), Some(EMAIL_INVALID));

        form.email = "Taken@Example.com".into();
        form.validate_email(&users);
        assert_eq!(form.errors.email.as_deref(), Some(EMAIL_TAKEN));

        form.email = "fresh@example.com".into();
        form.validate_email(&users);
        assert_eq!(form.errors.email, None);
    }

    #[test]
    fn test_email_pattern() {
        assert!(validate_email("a@b.co"));
        assert!(!validate_email("a b@c.d"));
        assert!(!validate_email("a@b"));
        assert!(!validate_email("@b.c"));
        assert!(!validate_email("a@@b.c"));
    }

    #[test]
    fn test_is_valid_after_validation() {
        let users = existing();
        let mut form = CreateForm::new();
        form.name = "Новый Пользователь".into();
        form.email = "new@example.com".into();
        form.validate(&users);
        assert!(form.is_valid());

        form.errors.name = Some(NAME_TOO_SHORT.into());
        assert!(!form.is_valid());
    }

    #[test]
    fn test_focus_next_validates_left_field() {
        let users = existing();
        let mut form = CreateForm::new();
        form.name = "ab".into();
        form.focus_next(&users);
        assert_eq!(form.focus, CreateField::Email);
        assert_eq!(form.errors.name.as_deref(), Some(NAME_TOO_SHORT));
        assert_eq!(form.errors.email, None);
    }

    #[test]
    fn test_toggle_focused() {
        let mut form = CreateForm {
            focus: CreateField::Role,
            ..Default::default()
        };
        form.toggle_focused();
        assert_eq!(form.role, Role::Moderator);

        form.focus = CreateField::WelcomeEmail;
        form.toggle_focused();
        assert!(!form.send_welcome_email);
    }

    #[test]
    fn test_to_user_trims_fields() {
        let form = CreateForm {
            name: "  Ann Lee ".into(),
            email: " ann@example.com ".into(),
            ..Default::default()
        };
        let user = form.to_user(42);
        assert_eq!(user.id, 42);
        assert_eq!(user.name, "Ann Lee");
        assert_eq!(user.email, "ann@example.com");
        assert_eq!(user.login_count, Some(0));
    }
}
