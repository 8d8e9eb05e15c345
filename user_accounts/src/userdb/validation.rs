use regex::Regex;
use serde::Deserialize;
use std::{fmt, sync::LazyLock};

const NAME_MAX_LEN: usize = 50;
const PASSWORD_MIN_LEN: usize = 6;
const PASSWORD_MAX_LEN: usize = 40;

pub(crate) const EMAIL_TAKEN_MESSAGE: &str = "has already been taken";

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[\w+\-.]+@[a-z\d\-.]+\.[a-z]+$").expect("email pattern is valid")
});

/// Submitted user form fields
///
/// Missing fields deserialize as empty strings so that an empty form and a
/// form with blank values are validated the same way.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserParams {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
}

/// A validation failure attached to one form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    /// Message prefixed with the humanized field name, e.g. "Name can't be blank"
    pub fn full_message(&self) -> String {
        let mut chars = self.field.chars();
        let humanized: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        format!("{} {}", humanized.replace('_', " "), self.message)
    }
}

/// Ordered list of field errors, in form field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub(crate) fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Messages recorded for one field
    pub fn on(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// True when the email is rejected only because another account uses it
    pub fn email_taken(&self) -> bool {
        self.on("email") == [EMAIL_TAKEN_MESSAGE]
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.errors.iter().map(FieldError::full_message).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_messages().join("; "))
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate submitted fields
///
/// `email_taken` reports whether another account already uses the
/// normalized email; the lookup is left to the caller.
pub(crate) fn validate_user_params(
    params: &UserParams,
    email_taken: bool,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = params.name.trim();
    if name.is_empty() {
        errors.add("name", "can't be blank");
    }
    if name.chars().count() > NAME_MAX_LEN {
        errors.add(
            "name",
            format!("is too long (maximum is {NAME_MAX_LEN} characters)"),
        );
    }

    let email = normalize_email(&params.email);
    if email.is_empty() {
        errors.add("email", "can't be blank");
    }
    if !EMAIL_REGEX.is_match(&email) {
        errors.add("email", "is invalid");
    }
    if email_taken {
        errors.add("email", EMAIL_TAKEN_MESSAGE);
    }

    let password_len = params.password.chars().count();
    if params.password.trim().is_empty() {
        errors.add("password", "can't be blank");
    }
    if params.password != params.password_confirmation {
        errors.add("password", "doesn't match confirmation");
    }
    if password_len < PASSWORD_MIN_LEN {
        errors.add(
            "password",
            format!("is too short (minimum is {PASSWORD_MIN_LEN} characters)"),
        );
    } else if password_len > PASSWORD_MAX_LEN {
        errors.add(
            "password",
            format!("is too long (maximum is {PASSWORD_MAX_LEN} characters)"),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
