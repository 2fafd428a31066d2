// src/web/usuario_handlers.rs
//! Gestión de cuentas, solo para gestores.

use crate::{
    error::AppResult,
    models::{paginacion::Pagina, usuario::UsuarioPublico},
    services::{requerido, usuario_service::ListarUsuariosInput},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ActivoBody {
    activo: Option<bool>,
}

// GET /api/usuarios?rol=&activo=&pagina=&porPagina=
pub async fn listar(
    State(state): State<AppState>,
    Query(input): Query<ListarUsuariosInput>,
) -> AppResult<Json<Pagina<UsuarioPublico>>> {
    Ok(Json(state.usuarios.listar(input).await?))
}

// PUT /api/usuarios/{id}/activo
pub async fn cambiar_activo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<ActivoBody>,
) -> AppResult<Json<UsuarioPublico>> {
    let activo = requerido("activo", body.activo)?;
    Ok(Json(state.usuarios.cambiar_activo(id, activo).await?))
}
