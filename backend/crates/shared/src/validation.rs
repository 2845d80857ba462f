//! Form Validation
//!
//! Field-keyed validation errors and the small set of checks shared by the
//! register, login and contact forms.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::app_error::AppError;

/// Maximum email length (RFC 5321)
pub const EMAIL_MAX_LENGTH: usize = 254;

/// Validation messages keyed by wire field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::validation(errors)
    }
}

/// Implemented by request DTOs
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Records an error unless `min <= chars(value.trim()) <= max`
pub fn check_length(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.trim().chars().count();
    if len == 0 && min > 0 {
        errors.add(field, format!("{label} is required"));
    } else if len < min {
        errors.add(field, format!("{label} must be at least {min} characters"));
    } else if len > max {
        errors.add(field, format!("{label} must be at most {max} characters"));
    }
}

/// Records an error unless `value` looks like an email address
pub fn check_email(errors: &mut ValidationErrors, field: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, "Email is required");
    } else if value.len() > EMAIL_MAX_LENGTH || !is_valid_email(value) {
        errors.add(field, "Email address is invalid");
    }
}

/// Basic structural email check; deliverability is not verified.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || local.len() > 64 || domain.contains('@') {
        return false;
    }

    if local.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    if domain.is_empty() || !domain.contains('.') {
        return false;
    }

    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return false;
    }

    !(domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
        || domain.contains(".."))
}
