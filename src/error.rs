// src/error.rs
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Violación de una regla de negocio o de entrada (campo requerido, enum inválido,
    /// formato, inexistente, estado en conflicto, duplicado). Siempre 4xx.
    #[error("{0}")]
    Validacion(String),

    #[error("Error en la base de datos: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Error de migración de la base de datos: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Error de variable de entorno: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("Error al procesar la contraseña")]
    PasswordHashingError,

    #[error("Credenciales inválidas")]
    CredencialesInvalidas,

    #[error("Error en la sesión: {0}")]
    SessionError(String),

    // Fila persistida que no respeta los invariantes (p. ej. asistencia sin evento)
    #[error("Datos inconsistentes en el almacenamiento: {0}")]
    DatosInconsistentes(String),

    #[error("Error interno inesperado")]
    InternalServerError,

    #[error("No autenticado")]
    NoAutenticado,

    #[error("Acceso denegado")]
    AccesoDenegado,
}

impl AppError {
    /// Atajo para construir un error de validación con cualquier mensaje.
    pub fn validacion(mensaje: impl Into<String>) -> Self {
        AppError::Validacion(mensaje.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validacion(_) => StatusCode::BAD_REQUEST,
            AppError::CredencialesInvalidas | AppError::NoAutenticado => StatusCode::UNAUTHORIZED,
            AppError::AccesoDenegado => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Cómo convertir AppError en una respuesta HTTP (JSON)
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        let mensaje = match &self {
            AppError::Validacion(msg) => {
                tracing::warn!("Regla de negocio rechazada: {}", msg);
                msg.clone()
            }
            AppError::CredencialesInvalidas => "Email o contraseña inválidos.".to_string(),
            AppError::NoAutenticado => "Debe iniciar sesión.".to_string(),
            AppError::AccesoDenegado => "No tiene permisos para esta operación.".to_string(),
            // Los detalles de los errores internos solo van al log
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) | AppError::DatosInconsistentes(_) => {
                tracing::error!("Error procesado: {:?}", self);
                "Error al acceder a los datos.".to_string()
            }
            AppError::EnvVarError(_) => {
                tracing::error!("Error procesado: {:?}", self);
                "Error de configuración.".to_string()
            }
            AppError::PasswordHashingError => {
                tracing::error!("Error procesado: {:?}", self);
                "Error al procesar credenciales.".to_string()
            }
            AppError::SessionError(_) => {
                tracing::error!("Error procesado: {:?}", self);
                "Error en la gestión de su sesión.".to_string()
            }
            AppError::InternalServerError => {
                tracing::error!("Error procesado: {:?}", self);
                "Ocurrió un error inesperado.".to_string()
            }
        };

        (status, Json(json!({ "error": mensaje }))).into_response()
    }
}

// Tipo Result por defecto de la aplicación
pub type AppResult<T = ()> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let err = AppError::validacion("rival es requerido");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "rival es requerido");
    }

    #[test]
    fn storage_errors_map_to_server_error() {
        let err = AppError::SqlxError(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::AccesoDenegado.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NoAutenticado.status_code(), StatusCode::UNAUTHORIZED);
    }
}
