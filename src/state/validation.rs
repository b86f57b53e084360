//! Field validators
//!
//! Each validator is a pure function of the candidate value. Lengths count
//! characters of the raw value; only the required check trims.

use super::form_data::FieldId;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

pub const NAME_MIN_LEN: usize = 2;
pub const MESSAGE_MIN_LEN: usize = 10;
pub const MESSAGE_MAX_LEN: usize = 500;

/// Countries offered by the country select, as (code, display name)
pub const COUNTRIES: &[(&str, &str)] = &[
    ("us", "United States"),
    ("ca", "Canada"),
    ("uk", "United Kingdom"),
    ("de", "Germany"),
    ("fr", "France"),
    ("jp", "Japan"),
    ("au", "Australia"),
    ("other", "Other"),
];

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Why a field value was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Must be at least {0} characters")]
    NameTooShort(usize),
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please select a country")]
    NoCountry,
    #[error("Please select a country from the list")]
    UnknownCountry,
    #[error("Message must be at least {0} characters")]
    MessageTooShort(usize),
    #[error("Message must be less than {0} characters")]
    MessageTooLong(usize),
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate a short free-text value (the name field)
pub fn validate_short_text(value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(ValidationError::Required("This field"));
    }
    if value.chars().count() < NAME_MIN_LEN {
        return Err(ValidationError::NameTooShort(NAME_MIN_LEN));
    }
    Ok(())
}

/// Validate an email address of the shape `local@domain.tld`
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(ValidationError::Required("Email"));
    }
    if !EMAIL_PATTERN.is_match(value) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Validate a long free-text value (the message field)
pub fn validate_long_text(value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(ValidationError::Required("Message"));
    }
    let len = value.chars().count();
    if len < MESSAGE_MIN_LEN {
        return Err(ValidationError::MessageTooShort(MESSAGE_MIN_LEN));
    }
    if len > MESSAGE_MAX_LEN {
        return Err(ValidationError::MessageTooLong(MESSAGE_MAX_LEN));
    }
    Ok(())
}

/// Validate a country code against [`COUNTRIES`]
pub fn validate_country(value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(ValidationError::NoCountry);
    }
    if country_name(value).is_none() {
        return Err(ValidationError::UnknownCountry);
    }
    Ok(())
}

/// Display name for a country code
pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Run the validator that belongs to `field`
pub fn validate(field: FieldId, value: &str) -> Result<(), ValidationError> {
    match field {
        FieldId::Name => validate_short_text(value),
        FieldId::Email => validate_email(value),
        FieldId::Country => validate_country(value),
        FieldId::Message => validate_long_text(value),
    }
}

/// Validation result in the store's representation (empty = valid)
pub fn error_message(field: FieldId, value: &str) -> String {
    match validate(field, value) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}
