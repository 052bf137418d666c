// src/config.rs

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{AccountRepository, UserRepository},
    services::{account_eraser::AccountEraser, admin_service::AdminService, auth::AuthService},
};

/// Configuração lida do ambiente (.env em desenvolvimento).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub token_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Separado de `from_env` para poder testar sem mexer no ambiente do processo.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .with_context(|| format!("{key} deve ser definida"))
        };

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR inválido")?;

        let db_max_connections = lookup("DB_MAX_CONNECTIONS")
            .map(|v| v.trim().parse::<u32>())
            .transpose()
            .context("DB_MAX_CONNECTIONS deve ser um número")?
            .unwrap_or(5);

        let token_ttl_hours = lookup("TOKEN_TTL_HOURS")
            .map(|v| v.trim().parse::<i64>())
            .transpose()
            .context("TOKEN_TTL_HOURS deve ser um número")?
            .unwrap_or(24 * 7);

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            bind_addr,
            db_max_connections,
            token_ttl_hours,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub admin_service: AdminService,
    pub i18n_store: Arc<I18nStore>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(db_pool: PgPool, config: Config) -> Self {
        let auth_service = AuthService::new(
            UserRepository::new(db_pool.clone()),
            config.jwt_secret.clone(),
            chrono::Duration::hours(config.token_ttl_hours),
        );

        let admin_service = AdminService::new(
            AccountRepository::new(db_pool.clone()),
            Arc::new(AccountEraser::postgres(&db_pool)),
            db_pool.clone(),
        );

        Self {
            db_pool,
            config: Arc::new(config),
            auth_service,
            admin_service,
            i18n_store: Arc::new(I18nStore::default()),
        }
    }
}
