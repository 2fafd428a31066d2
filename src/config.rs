// src/config.rs
use anyhow::{anyhow, Context, Result};
use std::{env, net::SocketAddr};

/// Longitud mínima del secreto: la clave de las cookies firmadas necesita 64 bytes.
pub const SECRETO_MIN_BYTES: usize = 64;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,
    pub bind_addr: SocketAddr,
    pub permitir_correccion_resultado: bool,
}

impl Config {
    /// Lee `.env` (si existe) y las variables del proceso.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::desde_variables(|clave| env::var(clave).ok())
    }

    fn desde_variables(leer: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = leer("DATABASE_URL").context("DATABASE_URL no está definida")?;

        let session_secret = leer("SESSION_SECRET").context("SESSION_SECRET no está definida")?;
        if session_secret.len() < SECRETO_MIN_BYTES {
            return Err(anyhow!(
                "SESSION_SECRET debe tener al menos {} bytes (tiene {})",
                SECRETO_MIN_BYTES,
                session_secret.len()
            ));
        }

        let bind_addr = leer("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR debe ser una dirección válida (host:puerto)")?;

        let permitir_correccion_resultado = match leer("PERMITIR_CORRECCION_RESULTADO") {
            None => true,
            Some(valor) => parsear_bool(&valor)
                .context("PERMITIR_CORRECCION_RESULTADO debe ser true o false")?,
        };

        Ok(Self { database_url, session_secret, bind_addr, permitir_correccion_resultado })
    }
}

fn parsear_bool(valor: &str) -> Result<bool> {
    match valor.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "si" | "sí" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        otro => Err(anyhow!("valor booleano inválido: '{}'", otro)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cargar(pares: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pares.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::desde_variables(|clave| vars.get(clave).cloned())
    }

    fn secreto() -> String {
        "x".repeat(SECRETO_MIN_BYTES)
    }

    #[test]
    fn test_defaults() {
        let s = secreto();
        let config = cargar(&[("DATABASE_URL", "sqlite://club.db"), ("SESSION_SECRET", &s)]).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert!(config.permitir_correccion_resultado);
    }

    #[test]
    fn test_required_and_secret_length() {
        let s = secreto();
        assert!(cargar(&[("SESSION_SECRET", &s)]).is_err());
        assert!(cargar(&[("DATABASE_URL", "sqlite://club.db")]).is_err());
        assert!(cargar(&[("DATABASE_URL", "sqlite://club.db"), ("SESSION_SECRET", "corto")]).is_err());
    }

    #[test]
    fn test_overrides() {
        let s = secreto();
        let config = cargar(&[
            ("DATABASE_URL", "sqlite://club.db"),
            ("SESSION_SECRET", &s),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("PERMITIR_CORRECCION_RESULTADO", "false"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert!(!config.permitir_correccion_resultado);

        let malo = cargar(&[("DATABASE_URL", "x"), ("SESSION_SECRET", &s), ("PERMITIR_CORRECCION_RESULTADO", "quizas")]);
        assert!(malo.is_err());
    }
}
