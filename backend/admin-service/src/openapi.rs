use actix_web::HttpResponse;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{applications, auth, commissions, health, registrations, supervisors, wallet};
use crate::models::{self, requests};
use crate::security::credentials::GeneratedCredentials;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::register,
        auth::login,
        auth::logout,
        auth::update_account,
        applications::submit,
        applications::list,
        applications::get_by_id,
        applications::approve,
        applications::reject,
        applications::delete,
        registrations::create,
        registrations::list,
        registrations::get_by_register_id,
        supervisors::list,
        supervisors::get_own_profile,
        supervisors::update_own_profile,
        supervisors::get_by_user_id,
        supervisors::update_by_user_id,
        supervisors::delete_by_user_id,
        wallet::credit,
        wallet::debit,
        wallet::history,
        commissions::record,
        commissions::history,
    ),
    components(schemas(
        models::Role,
        models::ApplicationStatus,
        models::Gender,
        models::Caste,
        models::RegistrationType,
        models::TransactionType,
        models::Address,
        models::ProfessionalInfo,
        models::User,
        models::SupervisorApplication,
        models::BeneficiaryRegistration,
        models::Supervisor,
        models::WalletTransaction,
        models::Commission,
        requests::RegisterRequest,
        requests::LoginRequest,
        requests::UpdateAccountRequest,
        requests::AddressRequest,
        requests::SubmitApplicationRequest,
        requests::RegisterBeneficiaryRequest,
        requests::UpdateSupervisorRequest,
        requests::WalletAdjustRequest,
        requests::RecordCommissionRequest,
        GeneratedCredentials,
        auth::AccountResponse,
        auth::RegisterResponse,
        auth::LoginResponse,
        auth::MessageResponse,
        applications::ApplicationListResponse,
        applications::SubmitApplicationResponse,
        registrations::RegistrationListResponse,
        supervisors::SupervisorListResponse,
        wallet::WalletAdjustResponse,
        commissions::CommissionResponse,
        health::HealthResponse,
    )),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Auth", description = "Accounts and sessions"),
        (name = "Applications", description = "Supervisor applications"),
        (name = "Registrations", description = "Beneficiary registrations"),
        (name = "Supervisors", description = "Supervisor profiles"),
        (name = "Wallet", description = "Wallet ledger"),
        (name = "Commissions", description = "Commission ledger"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
