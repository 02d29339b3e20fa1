use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use validator::{Validate, ValidationError};

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const INVALID_EMAIL: &str = "Enter a valid email address.";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email pattern is valid")
    })
}

/// Basic syntactic e-mail check.
pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// `custom` validator for e-mail fields. Blank values are left to the `length` rule.
pub(crate) fn email_address(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || is_valid_email(value) {
        return Ok(());
    }
    let mut error = ValidationError::new("email");
    error.message = Some(Cow::Borrowed(INVALID_EMAIL));
    Err(error)
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match error.code.as_ref() {
        "length" => {
            let len = error
                .params
                .get("value")
                .and_then(|v| v.as_str())
                .map_or(0, |v| v.chars().count());
            match error.params.get("max").and_then(|v| v.as_u64()) {
                Some(max) if len as u64 > max => {
                    format!("Ensure this value has at most {max} characters (it has {len}).")
                }
                _ => REQUIRED.to_string(),
            }
        }
        code => format!("Enter a valid value ({code})."),
    }
}

/// Field-level validation errors, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the `#[validate]` rules of `form` and collect what they report.
    pub fn check<T: Validate>(form: &T) -> Self {
        let mut errors = Self::new();
        if let Err(report) = form.validate() {
            for (field, failures) in report.field_errors() {
                for failure in failures {
                    errors.add(field.to_string(), describe(failure));
                }
            }
        }
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    /// `Ok(value)` when no error was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
