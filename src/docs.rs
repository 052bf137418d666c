// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::create_user,

        // --- Admin ---
        handlers::admin::list_accounts,
        handlers::admin::create_account,
        handlers::admin::get_account,
        handlers::admin::update_account_status,
        handlers::admin::erase_account,

        // --- CRM ---
        handlers::crm::create_customer,
        handlers::crm::create_follow_up,
        handlers::crm::create_event,

        // --- Equipe e catálogo ---
        handlers::team::create_technician,
        handlers::catalog::create_service,
        handlers::catalog::create_product,

        // --- Operações ---
        handlers::operations::create_service_order,
        handlers::operations::create_quote,
        handlers::operations::create_contract,

        // --- Frota ---
        handlers::fleet::create_vehicle,
        handlers::fleet::create_vehicle_usage,
        handlers::fleet::create_expense,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::NewUser,
            models::auth::AuthResponse,

            // --- Contas ---
            models::tenancy::AccountStatus,
            models::tenancy::Account,
            models::tenancy::NewAccount,
            models::tenancy::UpdateAccountStatus,
            models::tenancy::PurgedCollection,
            models::tenancy::AccountErasure,

            // --- CRM ---
            models::crm::FollowUpStatus,
            models::crm::Customer,
            models::crm::CustomerRef,
            models::crm::FollowUp,
            models::crm::Event,

            // --- Equipe ---
            models::team::TechnicianStatus,
            models::team::Technician,
            models::team::TechnicianRef,

            // --- Catálogo ---
            models::catalog::CatalogService,
            models::catalog::Product,

            // --- Operações ---
            models::operations::ServiceOrderStatus,
            models::operations::QuoteStatus,
            models::operations::ContractStatus,
            models::operations::ServiceOrder,
            models::operations::Quote,
            models::operations::Contract,

            // --- Frota ---
            models::fleet::VehicleStatus,
            models::fleet::Vehicle,
            models::fleet::VehicleRef,
            models::fleet::VehicleUsage,
            models::fleet::Expense,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação"),
        (name = "Users", description = "Usuários da conta"),
        (name = "Admin", description = "Contas da plataforma (super admin)"),
        (name = "CRM", description = "Clientes, follow-ups e agenda"),
        (name = "Equipe", description = "Técnicos de campo"),
        (name = "Catálogo", description = "Serviços e produtos"),
        (name = "Operações", description = "Ordens de serviço, orçamentos e contratos"),
        (name = "Frota", description = "Veículos, uso e despesas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
