// src/services/auth_service.rs
use crate::{
    error::{AppError, AppResult},
    models::usuario::Rol,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

// --- Hash de contraseñas ---

/// Colaborador de hashing usado por el registro, el login y el cambio de contraseña.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> AppResult<String>;
    async fn verify(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// bcrypt en un hilo bloqueante para no parar el runtime.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    coste: u32,
}

impl BcryptHasher {
    pub fn new(coste: u32) -> Self {
        Self { coste }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[async_trait]
impl PasswordHasher for BcryptHasher {
    async fn hash(&self, password: &str) -> AppResult<String> {
        let password = password.to_string();
        let coste = self.coste;
        tokio::task::spawn_blocking(move || {
            tracing::debug!("Generando hash bcrypt...");
            bcrypt::hash(&password, coste)
        })
        .await
        .map_err(|e| {
            tracing::error!("Error en la tarea spawn_blocking (hash): {:?}", e);
            AppError::InternalServerError
        })?
        .map_err(|e| {
            tracing::error!("Error bcrypt al generar hash: {:?}", e);
            AppError::PasswordHashingError
        })
    }

    async fn verify(&self, password: &str, hash: &str) -> AppResult<bool> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || {
            tracing::debug!("Verificando hash bcrypt...");
            bcrypt::verify(&password, &hash)
        })
        .await
        .map_err(|e| {
            tracing::error!("Error en la tarea spawn_blocking (verify): {:?}", e);
            AppError::InternalServerError
        })?
        .map_err(|e| {
            tracing::error!("Error bcrypt al verificar contraseña: {:?}", e);
            AppError::PasswordHashingError
        })
    }
}

// --- Sesiones (el token es el id de sesión, firmado en la cookie) ---

const CLAVE_SESION: &str = "usuario";

/// Lo que se guarda en la sesión tras un login correcto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioSesion {
    pub usuario_id: i64,
    pub rol: Rol,
}

impl UsuarioSesion {
    pub fn es_gestor(&self) -> bool {
        self.rol == Rol::Gestor
    }
}

/// Emite un id de sesión nuevo (evita fijación de sesión) y guarda los datos del usuario.
pub async fn iniciar_sesion(session: &Session, claims: UsuarioSesion) -> AppResult<()> {
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::SessionError(format!("Fallo al rotar el id: {}", e)))?;
    session
        .insert(CLAVE_SESION, claims)
        .await
        .map_err(|e| AppError::SessionError(format!("Fallo al escribir la sesión: {}", e)))?;
    tracing::info!("Sesión iniciada para el usuario {}", claims.usuario_id);
    Ok(())
}

pub async fn sesion_actual(session: &Session) -> AppResult<Option<UsuarioSesion>> {
    session
        .get::<UsuarioSesion>(CLAVE_SESION)
        .await
        .map_err(|e| AppError::SessionError(format!("Fallo al leer la sesión: {}", e)))
}

pub async fn cerrar_sesion(session: &Session) -> AppResult<()> {
    session
        .flush()
        .await
        .map_err(|e| AppError::SessionError(format!("Fallo al borrar la sesión: {}", e)))
}
