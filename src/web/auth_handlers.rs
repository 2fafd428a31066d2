// src/web/auth_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::usuario::{Rol, UsuarioPublico},
    services::{
        auth_service::{self, UsuarioSesion},
        usuario_service::{ActualizarPerfilInput, CambiarPasswordInput, LoginInput, RegistroInput},
    },
    state::AppState,
};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use tower_sessions::Session;

// POST /api/auth/registro
// Cualquiera puede registrarse como jugador; crear un gestor exige una sesión de gestor.
pub async fn registro(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<RegistroInput>,
) -> AppResult<(StatusCode, Json<UsuarioPublico>)> {
    if input.rol.as_deref() == Some(Rol::Gestor.as_str()) {
        let es_gestor = auth_service::sesion_actual(&session).await?.is_some_and(|s| s.es_gestor());
        if !es_gestor {
            tracing::warn!("Registro de gestor sin sesión de gestor");
            return Err(AppError::AccesoDenegado);
        }
    }
    let usuario = state.usuarios.registrar(input).await?;
    Ok((StatusCode::CREATED, Json(usuario)))
}

// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<UsuarioPublico>> {
    let usuario = state.usuarios.verificar_credenciales(input).await?;
    auth_service::iniciar_sesion(&session, UsuarioSesion { usuario_id: usuario.id, rol: usuario.rol }).await?;
    Ok(Json(usuario))
}

// POST /api/auth/logout
pub async fn logout(session: Session) -> AppResult<StatusCode> {
    if let Some(usuario) = auth_service::sesion_actual(&session).await? {
        tracing::info!("Usuario {} desconectado", usuario.usuario_id);
    }
    auth_service::cerrar_sesion(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/auth/perfil
pub async fn perfil(
    State(state): State<AppState>,
    Extension(sesion): Extension<UsuarioSesion>,
) -> AppResult<Json<UsuarioPublico>> {
    Ok(Json(state.usuarios.perfil(sesion.usuario_id).await?))
}

// PUT /api/auth/perfil
pub async fn actualizar_perfil(
    State(state): State<AppState>,
    Extension(sesion): Extension<UsuarioSesion>,
    Json(input): Json<ActualizarPerfilInput>,
) -> AppResult<Json<UsuarioPublico>> {
    Ok(Json(state.usuarios.actualizar_perfil(sesion.usuario_id, input).await?))
}

// PUT /api/auth/password
pub async fn cambiar_password(
    State(state): State<AppState>,
    Extension(sesion): Extension<UsuarioSesion>,
    Json(input): Json<CambiarPasswordInput>,
) -> AppResult<StatusCode> {
    state.usuarios.cambiar_password(sesion.usuario_id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}
