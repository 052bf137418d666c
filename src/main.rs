//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::handlers::scoped::{resource, with_status};
use crate::middleware::auth::auth_guard;
use crate::models::{
    auth::User,
    catalog::{CatalogService, Product},
    crm::{Customer, Event, FollowUp},
    fleet::{Expense, Vehicle, VehicleUsage},
    operations::{Contract, Quote, ServiceOrder},
    team::Technician,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    let app_state = AppState::new(config).await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let listener = TcpListener::bind(app_state.config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app(app_state)).await?;
    Ok(())
}

/// Todas as rotas da API, já com o estado.
fn app(app_state: AppState) -> Router {
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    let user_routes = resource::<User, _, _>(handlers::auth::create_user)
        .route("/me", get(handlers::auth::get_me));

    let tenant_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/customers", resource::<Customer, _, _>(handlers::crm::create_customer))
        .nest(
            "/follow-ups",
            with_status::<FollowUp>(resource::<FollowUp, _, _>(handlers::crm::create_follow_up)),
        )
        .nest("/events", resource::<Event, _, _>(handlers::crm::create_event))
        .nest(
            "/technicians",
            with_status::<Technician>(resource::<Technician, _, _>(handlers::team::create_technician)),
        )
        .nest("/services", resource::<CatalogService, _, _>(handlers::catalog::create_service))
        .nest("/products", resource::<Product, _, _>(handlers::catalog::create_product))
        .nest(
            "/service-orders",
            with_status::<ServiceOrder>(resource::<ServiceOrder, _, _>(
                handlers::operations::create_service_order,
            )),
        )
        .nest(
            "/quotes",
            with_status::<Quote>(resource::<Quote, _, _>(handlers::operations::create_quote)),
        )
        .nest(
            "/contracts",
            with_status::<Contract>(resource::<Contract, _, _>(handlers::operations::create_contract)),
        )
        .nest(
            "/vehicles",
            with_status::<Vehicle>(resource::<Vehicle, _, _>(handlers::fleet::create_vehicle)),
        )
        .nest(
            "/vehicle-usages",
            resource::<VehicleUsage, _, _>(handlers::fleet::create_vehicle_usage),
        )
        .nest("/expenses", resource::<Expense, _, _>(handlers::fleet::create_expense));

    let admin_routes = Router::new()
        .route(
            "/accounts",
            get(handlers::admin::list_accounts).post(handlers::admin::create_account),
        )
        .route(
            "/accounts/{id}",
            get(handlers::admin::get_account).delete(handlers::admin::erase_account),
        )
        .route(
            "/accounts/{id}/status",
            axum::routing::patch(handlers::admin::update_account_status),
        );

    // Tudo abaixo de /api (menos login e health) exige token
    let protected = Router::new()
        .merge(tenant_routes)
        .nest("/admin", admin_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(docs::ApiDoc::openapi()) }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;

    // Pool preguiçoso: nenhuma destas rotas chega ao banco.
    fn test_app() -> Router {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost/unused".into()),
            "JWT_SECRET" => Some("segredo-de-teste".into()),
            _ => None,
        })
        .unwrap();
        let pool = PgPoolOptions::new().connect_lazy(&config.database_url).unwrap();
        app(AppState::with_pool(pool, config))
    }

    async fn status_of(request: Request<Body>) -> StatusCode {
        test_app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn health_is_public() {
        let request = Request::get("/api/health").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let request = Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn tenant_routes_require_a_token() {
        for uri in ["/api/customers", "/api/follow-ups?page=abc", "/api/users/me"] {
            let request = Request::get(uri).body(Body::empty()).unwrap();
            assert_eq!(status_of(request).await, StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[tokio::test]
    async fn admin_routes_reject_garbage_tokens() {
        let request = Request::delete(format!("/api/admin/accounts/{}", uuid::Uuid::new_v4()))
            .header("Authorization", "Bearer nao-e-um-jwt")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::UNAUTHORIZED);
    }
}
