use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::shared::constants::NOT_INFORMED;

/// Closed set of action categories an opportunity can be filed under.
/// Serialized with the labels the backend stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    #[serde(rename = "Educação")]
    Education,
    #[serde(rename = "Saúde")]
    Health,
    #[serde(rename = "Direitos Humanos")]
    HumanRights,
    #[serde(rename = "Meio Ambiente")]
    Environment,
    #[serde(rename = "Assistência Social")]
    SocialAssistance,
    #[serde(rename = "Cultura e Esporte")]
    CultureAndSport,
    #[serde(rename = "Causa Animal")]
    AnimalWelfare,
    #[serde(rename = "Inclusão Digital")]
    DigitalInclusion,
    #[serde(rename = "Desenvolvimento Comunitário")]
    CommunityDevelopment,
    #[serde(rename = "Outros")]
    Other,
}

impl ActionType {
    pub const ALL: [ActionType; 10] = [
        ActionType::Education,
        ActionType::Health,
        ActionType::HumanRights,
        ActionType::Environment,
        ActionType::SocialAssistance,
        ActionType::CultureAndSport,
        ActionType::AnimalWelfare,
        ActionType::DigitalInclusion,
        ActionType::CommunityDevelopment,
        ActionType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ActionType::Education => "Educação",
            ActionType::Health => "Saúde",
            ActionType::HumanRights => "Direitos Humanos",
            ActionType::Environment => "Meio Ambiente",
            ActionType::SocialAssistance => "Assistência Social",
            ActionType::CultureAndSport => "Cultura e Esporte",
            ActionType::AnimalWelfare => "Causa Animal",
            ActionType::DigitalInclusion => "Inclusão Digital",
            ActionType::CommunityDevelopment => "Desenvolvimento Comunitário",
            ActionType::Other => "Outros",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }
}

/// Publication status of an opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OpportunityStatus {
    #[default]
    #[serde(rename = "ativa")]
    Active,
    #[serde(rename = "inativa")]
    Inactive,
    #[serde(rename = "encerrada")]
    Closed,
    #[serde(rename = "em_edicao")]
    InEdit,
}

impl OpportunityStatus {
    pub const ALL: [OpportunityStatus; 4] = [
        OpportunityStatus::Active,
        OpportunityStatus::Inactive,
        OpportunityStatus::Closed,
        OpportunityStatus::InEdit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityStatus::Active => "ativa",
            OpportunityStatus::Inactive => "inativa",
            OpportunityStatus::Closed => "encerrada",
            OpportunityStatus::InEdit => "em_edicao",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

/// Opportunity as exchanged with the backend.
///
/// `id` is absent for records that were never saved. Dates travel as
/// DD/MM/YYYY text and times as HH:MM text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "tipo_acao")]
    pub action_type: ActionType,
    #[serde(rename = "endereco")]
    pub address: String,
    #[serde(rename = "data_inicio", default)]
    pub start_date: Option<String>,
    #[serde(rename = "data_termino", default)]
    pub end_date: Option<String>,
    #[serde(rename = "hora_inicio", default)]
    pub start_time: Option<String>,
    #[serde(rename = "hora_termino", default)]
    pub end_time: Option<String>,
    #[serde(rename = "perfil_voluntario", default)]
    pub volunteer_profile: Option<String>,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "ong_nome")]
    pub organization_name: String,
    #[serde(rename = "num_vagas", default)]
    pub slot_count: Option<u32>,
    #[serde(rename = "status_vaga", default)]
    pub status: OpportunityStatus,
    #[serde(
        rename = "data_publicacao",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<NaiveDateTime>,
}

impl OpportunityRecord {
    /// Date and time summary shown on opportunity cards
    pub fn schedule_label(&self) -> String {
        fn filled(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|s| !s.is_empty())
        }

        let dates = match (filled(&self.start_date), filled(&self.end_date)) {
            (Some(start), Some(end)) if start == end => Some(start.to_string()),
            (Some(start), Some(end)) => Some(format!("{} to {}", start, end)),
            (Some(start), None) => Some(start.to_string()),
            (None, Some(end)) => Some(format!("until {}", end)),
            (None, None) => None,
        };

        let hours = match (filled(&self.start_time), filled(&self.end_time)) {
            (Some(start), Some(end)) => Some(format!("{} to {}", start, end)),
            (Some(start), None) => Some(format!("from {}", start)),
            (None, Some(end)) => Some(format!("until {}", end)),
            (None, None) => None,
        };

        match (dates, hours) {
            (Some(d), Some(h)) => format!("{}, {}", d, h),
            (Some(d), None) => d,
            (None, Some(h)) => h,
            (None, None) => NOT_INFORMED.to_string(),
        }
    }
}
