use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationErrors;

lazy_static! {
    /// Regex for form dates in DD/MM/YYYY
    /// - Valid shape: "10/05/2024", "31/04/2024" (calendar check happens separately)
    /// - Invalid: "1/5/2024", "32/01/2024", "10/13/2024", "10-05-2024", "10/05/24"
    pub static ref DATE_REGEX: Regex =
        Regex::new(r"^(0[1-9]|[12][0-9]|3[01])/(0[1-9]|1[0-2])/(\d{4})$").unwrap();

    /// Regex for 24-hour form times in HH:MM
    /// - Valid: "00:00", "09:30", "23:59"
    /// - Invalid: "24:00", "9:30", "12:60", "12h30"
    pub static ref TIME_REGEX: Regex = Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").unwrap();

    /// Regex for Brazilian CPF numbers in the masked form 000.000.000-00
    pub static ref CPF_REGEX: Regex = Regex::new(r"^\d{3}\.\d{3}\.\d{3}-\d{2}$").unwrap();
}

/// Parse a DD/MM/YYYY form date.
///
/// Returns `None` when the text does not match [`DATE_REGEX`] or when the
/// components do not name a real calendar day (31/04, 29/02 outside leap years).
pub fn parse_form_date(value: &str) -> Option<NaiveDate> {
    let caps = DATE_REGEX.captures(value)?;
    let day = caps[1].parse::<u32>().ok()?;
    let month = caps[2].parse::<u32>().ok()?;
    let year = caps[3].parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse an HH:MM form time on a 24-hour clock
pub fn parse_form_time(value: &str) -> Option<NaiveTime> {
    let caps = TIME_REGEX.captures(value)?;
    let hour = caps[1].parse::<u32>().ok()?;
    let minute = caps[2].parse::<u32>().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Field name to message mapping. Holds at most one message per field, the
/// first one recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message unless the field already has one
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when no field has an error
    pub fn into_result(self) -> crate::core::error::Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(crate::core::error::AppError::Validation(self))
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            if let Some(first) = field_errors.first() {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| first.code.to_string());
                out.insert(field.to_string(), message);
            }
        }
        out
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}
