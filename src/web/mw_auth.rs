// src/web/mw_auth.rs
use crate::{error::AppError, services::auth_service};
use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

/// Exige una sesión válida y deja sus datos (`UsuarioSesion`) en las extensiones de la petición.
pub async fn require_auth(session: Session, mut request: Request, next: Next) -> Result<Response, AppError> {
    match auth_service::sesion_actual(&session).await? {
        Some(usuario) => {
            tracing::debug!("Auth MW: usuario {} ({}) autenticado", usuario.usuario_id, usuario.rol);
            request.extensions_mut().insert(usuario);
            Ok(next.run(request).await)
        }
        None => {
            tracing::debug!("Auth MW: petición sin sesión a {}", request.uri().path());
            Err(AppError::NoAutenticado)
        }
    }
}
