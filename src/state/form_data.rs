//! Form data value objects shared by every widget

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one field of the contact form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Name,
    Email,
    Country,
    Message,
}

impl FieldId {
    /// All fields in form order
    pub const ALL: [FieldId; 4] = [
        FieldId::Name,
        FieldId::Email,
        FieldId::Country,
        FieldId::Message,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Full Name",
            Self::Email => "Email Address",
            Self::Country => "Country",
            Self::Message => "Message",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Country => "country",
            Self::Message => "message",
        }
    }
}

/// Current user input, one string per field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    pub name: String,
    pub email: String,
    pub country: String,
    pub message: String,
}

impl FormData {
    pub fn get(&self, field: FieldId) -> &str {
        match field {
            FieldId::Name => &self.name,
            FieldId::Email => &self.email,
            FieldId::Country => &self.country,
            FieldId::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: FieldId, value: String) {
        match field {
            FieldId::Name => self.name = value,
            FieldId::Email => self.email = value,
            FieldId::Country => self.country = value,
            FieldId::Message => self.message = value,
        }
    }

    /// True when every field holds a value
    pub fn is_complete(&self) -> bool {
        FieldId::ALL.iter().all(|f| !self.get(*f).is_empty())
    }
}

/// Per-field error messages; an empty string means no error
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub name: String,
    pub email: String,
    pub country: String,
    pub message: String,
}

impl FormErrors {
    pub fn get(&self, field: FieldId) -> &str {
        match field {
            FieldId::Name => &self.name,
            FieldId::Email => &self.email,
            FieldId::Country => &self.country,
            FieldId::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: FieldId, message: String) {
        match field {
            FieldId::Name => self.name = message,
            FieldId::Email => self.email = message,
            FieldId::Country => self.country = message,
            FieldId::Message => self.message = message,
        }
    }

    /// True when no field carries an error
    pub fn is_clear(&self) -> bool {
        FieldId::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}

/// Acknowledgement returned by the submission backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
}

/// A finished submission: the receipt plus exactly the data that was sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedForm {
    #[serde(flatten)]
    pub receipt: SubmitReceipt,
    pub data: FormData,
}

/// Where the form is in its submit cycle.
///
/// `Submitting` and `Submitted` are distinct variants, so the two flags can
/// never be observed true at the same time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    /// Terminal until the form is reset
    Submitted(SubmittedForm),
    /// The backend reported an error; the form can be submitted again
    Failed(String),
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }

    pub fn submitted(&self) -> Option<&SubmittedForm> {
        match self {
            Self::Submitted(form) => Some(form),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Full store state handed to subscribers after every change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub data: FormData,
    pub errors: FormErrors,
    pub submission: SubmissionState,
}

impl FormSnapshot {
    pub fn is_valid(&self) -> bool {
        is_valid(&self.data, &self.errors)
    }
}

/// Derived validity: every field is filled in and no field has an error.
///
/// Recomputed on every call; it is four string checks.
pub fn is_valid(data: &FormData, errors: &FormErrors) -> bool {
    errors.is_clear() && data.is_complete()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FormData {
        FormData {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            country: "uk".to_string(),
            message: "Hello from the terminal".to_string(),
        }
    }

    #[test]
    fn test_defaults_are_empty() {
        let data = FormData::default();
        let errors = FormErrors::default();
        for field in FieldId::ALL {
            assert_eq!(data.get(field), "");
            assert_eq!(errors.get(field), "");
        }
    }

    #[test]
    fn test_set_and_get_each_field() {
        let mut data = FormData::default();
        for field in FieldId::ALL {
            data.set(field, field.key().to_uppercase());
        }
        assert_eq!(data.name, "NAME");
        assert_eq!(data.email, "EMAIL");
        assert_eq!(data.country, "COUNTRY");
        assert_eq!(data.message, "MESSAGE");
    }

    #[test]
    fn test_valid_when_complete_and_clear() {
        assert!(is_valid(&filled(), &FormErrors::default()));
    }

    #[test]
    fn test_invalid_with_one_empty_field() {
        for field in FieldId::ALL {
            let mut data = filled();
            data.set(field, String::new());
            assert!(
                !is_valid(&data, &FormErrors::default()),
                "{field:?} empty should be invalid"
            );
        }
    }

    #[test]
    fn test_invalid_with_one_error() {
        for field in FieldId::ALL {
            let mut errors = FormErrors::default();
            errors.set(field, "bad".to_string());
            assert!(!is_valid(&filled(), &errors));
        }
    }

    #[test]
    fn test_submission_flags() {
        assert!(!SubmissionState::Idle.is_submitting());
        assert!(!SubmissionState::Idle.is_submitted());
        assert!(SubmissionState::Submitting.is_submitting());
        assert!(!SubmissionState::Submitting.is_submitted());

        let receipt = SubmitReceipt {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
        };
        let done = SubmissionState::Submitted(SubmittedForm {
            receipt: receipt.clone(),
            data: filled(),
        });
        assert!(done.is_submitted());
        assert!(!done.is_submitting());
        assert_eq!(done.submitted().map(|s| &s.receipt), Some(&receipt));
        assert_eq!(done.submitted().map(|s| &s.data), Some(&filled()));

        let failed = SubmissionState::Failed("offline".to_string());
        assert!(!failed.is_submitting());
        assert!(!failed.is_submitted());
        assert_eq!(failed.failure(), Some("offline"));
    }

    #[test]
    fn test_form_data_serializes_with_field_keys() {
        let json = serde_json::to_value(filled()).unwrap();
        for field in FieldId::ALL {
            assert!(json.get(field.key()).is_some());
        }
    }
}
