// src/web/catalogo_handlers.rs
use crate::{
    error::AppResult,
    models::catalogo::{MotivoAusencia, Posicion},
    state::AppState,
};
use axum::{extract::State, Json};

// GET /api/posiciones
pub async fn posiciones(State(state): State<AppState>) -> AppResult<Json<Vec<Posicion>>> {
    Ok(Json(state.catalogo.listar_posiciones().await?))
}

// GET /api/motivos-ausencia
pub async fn motivos_ausencia(State(state): State<AppState>) -> AppResult<Json<Vec<MotivoAusencia>>> {
    Ok(Json(state.catalogo.listar_motivos_ausencia().await?))
}
