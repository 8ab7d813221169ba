use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{Address, ApplicationStatus, Caste, Gender, ProfessionalInfo, RegistrationType, Role};
use crate::validators::{validate_mobile_validator, validate_pincode_validator};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,

    /// Defaults to supervisor. Requesting admin requires an authenticated
    /// admin caller.
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Partial account update. Absent fields keep their stored values.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 6, max = 128))]
    pub password: Option<String>,

    pub role: Option<Role>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddressRequest {
    pub address_line: Option<String>,
    pub post: Option<String>,
    pub police_station: Option<String>,
    pub tehsil: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,

    #[validate(custom(function = "validate_pincode_validator"))]
    pub pincode: Option<String>,
}

impl From<AddressRequest> for Address {
    fn from(req: AddressRequest) -> Self {
        Address {
            address_line: req.address_line,
            post: req.post,
            police_station: req.police_station,
            tehsil: req.tehsil,
            district: req.district,
            state: req.state,
            pincode: req.pincode,
        }
    }
}

/// Application submission. Credentials are not part of the request: the
/// service issues a fresh login id and one-time password per submission.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitApplicationRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,

    #[validate(length(min = 1, max = 120))]
    pub father_name: String,

    #[validate(length(min = 1, max = 120))]
    pub mother_name: String,

    pub dob: NaiveDate,
    pub gender: Gender,
    pub caste: Caste,

    #[validate(custom(function = "validate_mobile_validator"))]
    pub mobile_number: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 200))]
    pub yojana_name: String,

    #[validate(length(min = 1, max = 120))]
    pub job_type: String,

    /// Falls back to the configured default when omitted.
    pub registration_fee: Option<f64>,

    #[validate(nested)]
    pub permanent_address: Option<AddressRequest>,

    #[validate(nested)]
    pub correspondence_address: Option<AddressRequest>,

    #[validate(length(min = 1, max = 60))]
    pub identity_document_type: String,

    #[validate(length(min = 1, max = 60))]
    pub document_number: String,

    pub attached_document: Option<String>,
    pub photo: Option<String>,
    pub signature: Option<String>,

    #[validate(range(min = 0, max = 60))]
    pub experience_years: Option<i32>,

    pub educational_qualification: Option<String>,
    pub preferred_panchayat: Option<String>,
}

/// Beneficiary enrolment filed by the authenticated supervisor. Photo,
/// signature and identity document are references to already-stored
/// filenames; no file content passes through this API.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterBeneficiaryRequest {
    /// Defaults to a yojana enrolment.
    pub registration_type: Option<RegistrationType>,

    #[validate(length(min = 1, max = 200))]
    pub yojana_name: String,

    #[validate(length(min = 1, max = 120))]
    pub full_name: String,

    #[validate(length(min = 1, max = 120))]
    pub guardian_name: String,

    pub mother_name: Option<String>,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub caste: Caste,

    #[validate(custom(function = "validate_mobile_validator"))]
    pub mobile_number: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(nested)]
    pub address: Option<AddressRequest>,

    #[validate(nested)]
    pub correspondence_address: Option<AddressRequest>,

    pub guardian_annual_income: Option<String>,
    pub ration_card: Option<String>,
    pub village_head_name: Option<String>,
    pub previous_training_institute: Option<String>,
    pub work_duration: Option<String>,
    pub preferred_panchayat: Option<String>,

    #[validate(length(min = 1, max = 60))]
    pub identity_document_type: String,

    #[validate(length(min = 1, max = 60))]
    pub document_number: String,

    pub photo: Option<String>,
    pub signature: Option<String>,
    pub identity_document: Option<String>,

    #[validate(range(min = 0.0))]
    pub fee: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListRegistrationsQuery {
    /// Case-insensitive substring match on name, mobile number, or
    /// register id.
    pub search: Option<String>,

    /// One of: created_at, full_name, yojana_name, register_id. Anything
    /// else falls back to created_at.
    pub sort_by: Option<String>,

    /// "asc" or "desc" (default).
    pub sort_order: Option<String>,

    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListApplicationsQuery {
    pub status: Option<ApplicationStatus>,

    /// Case-insensitive substring match on name, email, or mobile number.
    pub search: Option<String>,

    /// One of: created_at, full_name, email, status. Anything else falls back
    /// to created_at.
    pub sort_by: Option<String>,

    /// "asc" or "desc" (default).
    pub sort_order: Option<String>,

    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListSupervisorsQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Partial supervisor profile update. Wallet balances and counters are
/// adjusted through the ledger endpoints, never patched directly.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateSupervisorRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,

    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,

    #[validate(custom(function = "validate_mobile_validator"))]
    pub mobile_number: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    pub professional_info: Option<ProfessionalInfo>,
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct WalletAdjustRequest {
    #[validate(range(min = 0.01))]
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RecordCommissionRequest {
    #[validate(range(min = 0.01))]
    pub commission_amount: f64,
}
