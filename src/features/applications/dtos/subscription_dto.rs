use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::features::applications::models::ApplicationRequest;
use crate::shared::validation::{FieldErrors, CPF_REGEX};

/// Volunteer subscription form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SubscriptionForm {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,

    /// YYYY-MM-DD
    #[validate(length(min = 1, message = "Birth date is required"))]
    pub birth_date: String,

    #[validate(regex(path = *CPF_REGEX, message = "Invalid CPF"))]
    pub cpf: Option<String>,

    #[validate(length(min = 1, message = "Explain your motivation"))]
    pub motivation: String,
}

impl SubscriptionForm {
    /// Field errors of the form; empty when it may be submitted
    pub fn field_errors(&self) -> FieldErrors {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };

        if !self.birth_date.is_empty()
            && NaiveDate::parse_from_str(&self.birth_date, "%Y-%m-%d").is_err()
        {
            errors.insert("birth_date", "Enter a valid birth date (YYYY-MM-DD)");
        }

        errors
    }

    pub fn to_request(&self, opportunity_id: i64) -> ApplicationRequest {
        ApplicationRequest {
            full_name: self.full_name.clone(),
            birth_date: self.birth_date.clone(),
            cpf: self.cpf.clone().unwrap_or_default(),
            motivation: self.motivation.clone(),
            opportunity_id,
        }
    }
}
