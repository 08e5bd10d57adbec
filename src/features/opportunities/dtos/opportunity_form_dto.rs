use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::error::Result;
use crate::features::opportunities::models::{ActionType, OpportunityRecord, OpportunityStatus};
use crate::features::opportunities::validator::validate_opportunity;
use crate::shared::mask::{apply_mask, DATE_MASK, TIME_MASK};

/// Fields of the opportunity form, named as they appear in error maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OpportunityField {
    Title,
    ActionType,
    Address,
    StartDate,
    EndDate,
    StartTime,
    EndTime,
    VolunteerProfile,
    Description,
    OrganizationName,
    SlotCount,
    Status,
}

impl OpportunityField {
    pub const ALL: [OpportunityField; 12] = [
        OpportunityField::Title,
        OpportunityField::ActionType,
        OpportunityField::Address,
        OpportunityField::StartDate,
        OpportunityField::EndDate,
        OpportunityField::StartTime,
        OpportunityField::EndTime,
        OpportunityField::VolunteerProfile,
        OpportunityField::Description,
        OpportunityField::OrganizationName,
        OpportunityField::SlotCount,
        OpportunityField::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityField::Title => "title",
            OpportunityField::ActionType => "action_type",
            OpportunityField::Address => "address",
            OpportunityField::StartDate => "start_date",
            OpportunityField::EndDate => "end_date",
            OpportunityField::StartTime => "start_time",
            OpportunityField::EndTime => "end_time",
            OpportunityField::VolunteerProfile => "volunteer_profile",
            OpportunityField::Description => "description",
            OpportunityField::OrganizationName => "organization_name",
            OpportunityField::SlotCount => "slot_count",
            OpportunityField::Status => "status",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    /// Input mask applied while typing, if any
    pub fn mask(&self) -> Option<&'static str> {
        match self {
            OpportunityField::StartDate | OpportunityField::EndDate => Some(DATE_MASK),
            OpportunityField::StartTime | OpportunityField::EndTime => Some(TIME_MASK),
            _ => None,
        }
    }
}

/// Raw text values of the opportunity form, as typed.
///
/// Empty string means "not filled in". Presence rules for the plain text
/// fields are declared here; enum, number, date, time and cross-field rules
/// live in [`validate_opportunity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OpportunityForm {
    #[validate(length(min = 1, message = "Opportunity name is required"))]
    pub title: String,

    pub action_type: String,

    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,

    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,

    pub volunteer_profile: String,

    #[validate(length(min = 1, message = "Opportunity description is required"))]
    pub description: String,

    #[validate(length(min = 1, message = "Organization name is required"))]
    pub organization_name: String,

    pub slot_count: String,

    pub status: String,
}

impl Default for OpportunityForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            action_type: String::new(),
            address: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            volunteer_profile: String::new(),
            description: String::new(),
            organization_name: String::new(),
            slot_count: String::new(),
            status: OpportunityStatus::default().as_str().to_string(),
        }
    }
}

impl OpportunityForm {
    /// Form values for a record opened in edit mode. Absent values become
    /// empty text and an absent status falls back to active.
    pub fn from_record(record: &OpportunityRecord) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            title: record.title.clone(),
            action_type: record.action_type.label().to_string(),
            address: record.address.clone(),
            start_date: text(&record.start_date),
            end_date: text(&record.end_date),
            start_time: text(&record.start_time),
            end_time: text(&record.end_time),
            volunteer_profile: text(&record.volunteer_profile),
            description: record.description.clone(),
            organization_name: record.organization_name.clone(),
            slot_count: record
                .slot_count
                .map(|n| n.to_string())
                .unwrap_or_default(),
            status: record.status.as_str().to_string(),
        }
    }

    pub fn get(&self, field: OpportunityField) -> &str {
        match field {
            OpportunityField::Title => &self.title,
            OpportunityField::ActionType => &self.action_type,
            OpportunityField::Address => &self.address,
            OpportunityField::StartDate => &self.start_date,
            OpportunityField::EndDate => &self.end_date,
            OpportunityField::StartTime => &self.start_time,
            OpportunityField::EndTime => &self.end_time,
            OpportunityField::VolunteerProfile => &self.volunteer_profile,
            OpportunityField::Description => &self.description,
            OpportunityField::OrganizationName => &self.organization_name,
            OpportunityField::SlotCount => &self.slot_count,
            OpportunityField::Status => &self.status,
        }
    }

    /// Store a typed value, passing date and time fields through their mask
    pub fn set(&mut self, field: OpportunityField, value: &str) {
        let value = match field.mask() {
            Some(mask) => apply_mask(mask, value),
            None => value.to_string(),
        };
        let slot = match field {
            OpportunityField::Title => &mut self.title,
            OpportunityField::ActionType => &mut self.action_type,
            OpportunityField::Address => &mut self.address,
            OpportunityField::StartDate => &mut self.start_date,
            OpportunityField::EndDate => &mut self.end_date,
            OpportunityField::StartTime => &mut self.start_time,
            OpportunityField::EndTime => &mut self.end_time,
            OpportunityField::VolunteerProfile => &mut self.volunteer_profile,
            OpportunityField::Description => &mut self.description,
            OpportunityField::OrganizationName => &mut self.organization_name,
            OpportunityField::SlotCount => &mut self.slot_count,
            OpportunityField::Status => &mut self.status,
        };
        *slot = value;
    }

    /// Copy of the form as if every value had been typed through [`Self::set`]
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        for field in OpportunityField::ALL {
            masked.set(field, self.get(field));
        }
        masked
    }

    /// Fields whose value differs from `original`
    pub fn changed_fields(&self, original: &OpportunityForm) -> Vec<OpportunityField> {
        OpportunityField::ALL
            .into_iter()
            .filter(|f| self.get(*f) != original.get(*f))
            .collect()
    }

    pub fn has_changes_from(&self, original: &OpportunityForm) -> bool {
        !self.changed_fields(original).is_empty()
    }

    /// Validate and convert into the record sent to the backend
    pub fn to_record(&self, id: Option<i64>) -> Result<OpportunityRecord> {
        validate_opportunity(self).into_result()?;

        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());

        // Both parses are guaranteed by the validation above.
        let action_type = ActionType::from_label(&self.action_type).unwrap_or(ActionType::Other);
        let status = OpportunityStatus::parse(&self.status).unwrap_or_default();
        let slot_count = self
            .slot_count
            .trim()
            .parse::<f64>()
            .ok()
            .map(|n| n as u32);

        Ok(OpportunityRecord {
            id,
            title: self.title.clone(),
            action_type,
            address: self.address.clone(),
            start_date: optional(&self.start_date),
            end_date: optional(&self.end_date),
            start_time: optional(&self.start_time),
            end_time: optional(&self.end_time),
            volunteer_profile: optional(&self.volunteer_profile),
            description: self.description.clone(),
            organization_name: self.organization_name.clone(),
            slot_count,
            status,
            published_at: None,
        })
    }
}
