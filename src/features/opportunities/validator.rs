use chrono::{NaiveDate, NaiveTime};
use validator::Validate;

use crate::features::opportunities::dtos::{OpportunityField, OpportunityForm};
use crate::features::opportunities::models::{ActionType, OpportunityStatus};
use crate::shared::validation::{
    parse_form_date, parse_form_time, FieldErrors, DATE_REGEX, TIME_REGEX,
};

const INVALID_DATE_FORMAT: &str = "Enter a valid date (DD/MM/YYYY).";
const INVALID_TIME_FORMAT: &str = "Enter a valid time (HH:MM).";

/// Validate every field of an opportunity form.
///
/// Pure: the result depends only on `form`. All rules run on every call and
/// each field reports its first failing rule. An empty result means the
/// form may be submitted.
pub fn validate_opportunity(form: &OpportunityForm) -> FieldErrors {
    let mut errors = match form.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => FieldErrors::from(e),
    };

    if form.action_type.is_empty() {
        errors.insert(OpportunityField::ActionType.as_str(), "Action type is required");
    } else if ActionType::from_label(&form.action_type).is_none() {
        errors.insert(OpportunityField::ActionType.as_str(), "Select a valid action type");
    }

    if form.status.is_empty() {
        errors.insert(OpportunityField::Status.as_str(), "Status is required");
    } else if OpportunityStatus::parse(&form.status).is_none() {
        errors.insert(OpportunityField::Status.as_str(), "Invalid status");
    }

    if let Some(message) = slot_count_error(&form.slot_count) {
        errors.insert(OpportunityField::SlotCount.as_str(), message);
    }

    let start_date = check_date(
        &mut errors,
        OpportunityField::StartDate,
        &form.start_date,
        "Enter a valid start date (29/02 only exists in leap years).",
    );
    let end_date = check_date(
        &mut errors,
        OpportunityField::EndDate,
        &form.end_date,
        "Enter a valid end date (31/04 does not exist).",
    );
    let start_time = check_time(&mut errors, OpportunityField::StartTime, &form.start_time);
    let end_time = check_time(&mut errors, OpportunityField::EndTime, &form.end_time);

    let needs_start_date =
        !form.end_date.is_empty() || !form.start_time.is_empty() || !form.end_time.is_empty();
    if form.start_date.is_empty() && needs_start_date {
        errors.insert(
            OpportunityField::StartDate.as_str(),
            "Start date is required when an end date or a time is filled in.",
        );
    }

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            errors.insert(
                OpportunityField::EndDate.as_str(),
                "End date cannot be earlier than the start date.",
            );
        }
    }

    if form.start_time.is_empty() && !form.end_time.is_empty() {
        errors.insert(
            OpportunityField::StartTime.as_str(),
            "Start time is required when an end time is filled in.",
        );
    }

    // Time ordering only matters within a single day.
    if let (Some(start), Some(end)) = (start_time, end_time) {
        let same_day = matches!((start_date, end_date), (Some(a), Some(b)) if a == b);
        if same_day && end <= start {
            errors.insert(
                OpportunityField::EndTime.as_str(),
                "End time must be later than the start time on the same day.",
            );
        }
    }

    errors
}

fn check_date(
    errors: &mut FieldErrors,
    field: OpportunityField,
    value: &str,
    calendar_message: &str,
) -> Option<NaiveDate> {
    if value.is_empty() {
        return None;
    }
    if !DATE_REGEX.is_match(value) {
        errors.insert(field.as_str(), INVALID_DATE_FORMAT);
        return None;
    }
    let parsed = parse_form_date(value);
    if parsed.is_none() {
        errors.insert(field.as_str(), calendar_message);
    }
    parsed
}

fn check_time(errors: &mut FieldErrors, field: OpportunityField, value: &str) -> Option<NaiveTime> {
    if value.is_empty() {
        return None;
    }
    if !TIME_REGEX.is_match(value) {
        errors.insert(field.as_str(), INVALID_TIME_FORMAT);
        return None;
    }
    parse_form_time(value)
}

fn slot_count_error(value: &str) -> Option<&'static str> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let number = match value.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => return Some("Slot count must be a number"),
    };
    if number < 1.0 {
        Some("Minimum 1 slot")
    } else if number.fract() != 0.0 {
        Some("Must be a whole number")
    } else if number > f64::from(u32::MAX) {
        Some("Slot count is too large")
    } else {
        None
    }
}
