pub mod requests;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Account role. The role class is encoded in the `user_id` prefix:
/// `A-` for admins, `I-` for supervisor-class accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Supervisor,
}

impl Role {
    pub fn id_prefix(&self) -> char {
        match self {
            Role::Admin => 'A',
            Role::Supervisor => 'I',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "application_status", rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "caste_category", rename_all = "lowercase")]
pub enum Caste {
    General,
    #[serde(rename = "OBC")]
    Obc,
    #[serde(rename = "SC")]
    Sc,
    #[serde(rename = "ST")]
    St,
}

/// What a beneficiary registration counts towards: a yojana enrolment or an
/// intern placement. Each feeds its own per-supervisor counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "registration_type", rename_all = "lowercase")]
pub enum RegistrationType {
    Yojana,
    Intern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transaction_type", rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    Debit,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Postal address carried on applications. Every field is optional; absent
/// fields stay absent instead of falling back to empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub address_line: Option<String>,
    pub post: Option<String>,
    pub police_station: Option<String>,
    pub tehsil: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SupervisorApplication {
    pub id: Uuid,
    pub user_id: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub father_name: String,
    pub mother_name: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub caste: Caste,
    pub mobile_number: String,
    pub email: String,
    pub yojana_name: String,
    pub job_type: String,
    pub registration_fee: f64,
    #[schema(value_type = Address)]
    pub permanent_address: Json<Address>,
    #[schema(value_type = Address)]
    pub correspondence_address: Json<Address>,
    pub identity_document_type: String,
    pub document_number: String,
    pub attached_document: Option<String>,
    pub photo: Option<String>,
    pub signature: Option<String>,
    pub experience_years: Option<i32>,
    pub educational_qualification: Option<String>,
    pub preferred_panchayat: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProfessionalInfo {
    pub mondal_name: Option<String>,
    pub department_name: Option<String>,
    pub working_area: Option<String>,
    pub working_city: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Supervisor {
    pub id: Uuid,
    pub user_id: String,
    pub register_id: String,
    pub name: String,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub mobile_number: String,
    pub email: String,
    pub registration_fee: f64,
    pub commission: f64,
    pub earning_commission: f64,
    pub old_wallet_cr: f64,
    pub old_wallet_dr: f64,
    pub wallet_cr: f64,
    pub wallet_dr: f64,
    pub balance: f64,
    pub total_intern_reg: i32,
    pub total_yojana_reg: i32,
    pub total_reg: i32,
    #[schema(value_type = ProfessionalInfo)]
    pub professional_info: Json<ProfessionalInfo>,
    pub photo: Option<String>,
    pub joining_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A beneficiary enrolled by a supervisor. Document fields carry stored
/// filenames only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BeneficiaryRegistration {
    pub id: Uuid,
    pub register_id: String,
    pub supervisor_user_id: String,
    pub registration_type: RegistrationType,
    pub yojana_name: String,
    pub full_name: String,
    pub guardian_name: String,
    pub mother_name: Option<String>,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub caste: Caste,
    pub mobile_number: String,
    pub email: Option<String>,
    #[schema(value_type = Address)]
    pub address: Json<Address>,
    #[schema(value_type = Address)]
    pub correspondence_address: Json<Address>,
    pub guardian_annual_income: Option<String>,
    pub ration_card: Option<String>,
    pub village_head_name: Option<String>,
    pub previous_training_institute: Option<String>,
    pub work_duration: Option<String>,
    pub preferred_panchayat: Option<String>,
    pub identity_document_type: String,
    pub document_number: String,
    pub photo: Option<String>,
    pub signature: Option<String>,
    pub identity_document: Option<String>,
    pub fee: f64,
    pub transaction_id: Option<String>,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WalletTransaction {
    pub id: Uuid,
    pub supervisor_id: Uuid,
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Commission {
    pub id: Uuid,
    pub supervisor_id: Uuid,
    pub commission_amount: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RevokedToken {
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_id_prefix() {
        assert_eq!(Role::Admin.id_prefix(), 'A');
        assert_eq!(Role::Supervisor.id_prefix(), 'I');
    }

    #[test]
    fn test_caste_serde_uses_official_abbreviations() {
        assert_eq!(serde_json::to_string(&Caste::Obc).unwrap(), "\"OBC\"");
        assert_eq!(serde_json::to_string(&Caste::General).unwrap(), "\"General\"");
    }
}
