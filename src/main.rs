// src/main.rs

// --- Módulos ---
mod config;
mod db;
mod error;
mod models;
mod repositories;
mod services;
mod state;
mod web;

// --- Imports ---
use crate::{config::Config, services::auth_service::BcryptHasher, state::AppState};
use axum::serve;
use std::{env, sync::Arc};
use time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::Key, ExpiredDeletion, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- Configuración ---
    let config = Config::from_env()?;

    // --- Logging (tracing) ---
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            env::var("RUST_LOG")
                .unwrap_or_else(|_| "club_asistencia=debug,tower_http=info,sqlx=warn,tower_sessions=info".into())
                .into()
        }))
        .with(fmt::layer())
        .init();

    tracing::info!("Iniciando servidor de asistencia del club...");

    // --- Base de datos ---
    let db_pool = match db::create_db_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Fallo crítico al inicializar la base de datos: {}", e);
            return Err(anyhow::anyhow!("No se pudo conectar/migrar la base de datos: {}", e));
        }
    };

    // --- Sesiones ---
    let session_store = SqliteStore::new(db_pool.clone())
        .with_table_name("sessions")
        .map_err(|e| anyhow::anyhow!("No se pudo crear el almacén de sesiones: {}", e))?;
    session_store.migrate().await?;

    let limpieza_store = session_store.clone();
    tokio::spawn(async move {
        if let Err(e) = limpieza_store
            .continuously_delete_expired(tokio::time::Duration::from_secs(60 * 60))
            .await
        {
            tracing::error!("Error en la tarea de limpieza de sesiones: {:?}", e);
        }
    });
    tracing::info!("Tarea de limpieza de sesiones iniciada.");

    // El id de sesión es el token: va en una cookie firmada con el secreto
    let key = Key::try_from(config.session_secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("SESSION_SECRET no sirve como clave: {}", e))?;
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)))
        .with_signed(key);

    // --- Estado de la aplicación ---
    let app_state = AppState::new(db_pool, &config, Arc::new(BcryptHasher::default()));

    // --- Listener ---
    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("No se pudo escuchar en {}: {}", config.bind_addr, e);
            return Err(e.into());
        }
    };
    tracing::info!("Servidor escuchando en http://{}", config.bind_addr);

    // --- Router y middlewares ---
    let app = web::routes::create_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(session_layer),
    );

    if let Err(e) = serve(listener, app.into_make_service()).await {
        tracing::error!("Error fatal en el servidor: {}", e);
        return Err(e.into());
    }

    Ok(())
}
