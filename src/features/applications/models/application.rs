use serde::{Deserialize, Serialize};

/// Application payload posted by a volunteer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRequest {
    #[serde(rename = "nome")]
    pub full_name: String,
    /// YYYY-MM-DD
    #[serde(rename = "nascimento")]
    pub birth_date: String,
    pub cpf: String,
    #[serde(rename = "mensagem")]
    pub motivation: String,
    #[serde(rename = "oportunidade_id")]
    pub opportunity_id: i64,
}

/// Registered volunteer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volunteer {
    pub id: i64,
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// One application as listed for a volunteer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerApplication {
    #[serde(rename = "inscricao_id")]
    pub id: i64,
    #[serde(rename = "oportunidade_id")]
    pub opportunity_id: i64,
    #[serde(rename = "oportunidade_titulo", default)]
    pub opportunity_title: Option<String>,
    #[serde(rename = "data_inscricao", default)]
    pub applied_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Volunteer who applied to a given opportunity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Applicant {
    pub volunteer: Volunteer,
    pub application: VolunteerApplication,
}
