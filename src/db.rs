// src/db.rs
use crate::error::AppResult;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

pub async fn create_db_pool(database_url: &str) -> AppResult<SqlitePool> {
    tracing::info!("Conectando a la base de datos: {}", database_url);

    // Crear el fichero si no existe; esperar hasta 5s si la base está bloqueada
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    ejecutar_migraciones(&pool).await?;

    Ok(pool)
}

/// Aplica los ficheros SQL de ./migrations (embebidos en compilación).
pub async fn ejecutar_migraciones(pool: &SqlitePool) -> AppResult<()> {
    tracing::info!("Ejecutando migraciones de la base de datos...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Migraciones completadas.");
    Ok(())
}

/// Base en memoria con el esquema real, para las pruebas de los repositorios.
#[cfg(test)]
pub async fn pool_en_memoria() -> SqlitePool {
    // Una sola conexión que nunca se recicla: cada conexión en memoria es una base distinta
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(SqliteConnectOptions::from_str("sqlite::memory:").unwrap().foreign_keys(true))
        .await
        .unwrap();
    ejecutar_migraciones(&pool).await.unwrap();
    pool
}
