// src/web/mw_gestor.rs
use crate::{error::AppError, services::auth_service::UsuarioSesion};
use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::Response,
};

/// Solo deja pasar a usuarios con rol gestor. Debe ir *detrás* de `require_auth`.
pub async fn require_gestor(
    Extension(usuario): Extension<UsuarioSesion>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if usuario.es_gestor() {
        return Ok(next.run(request).await);
    }
    tracing::warn!(
        "Gestor MW: acceso denegado a {} {} para el usuario {}",
        request.method(),
        request.uri().path(),
        usuario.usuario_id
    );
    Err(AppError::AccesoDenegado)
}
