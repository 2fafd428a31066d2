// src/web/entrenamiento_handlers.rs
use crate::{
    error::AppResult,
    models::{entrenamiento::EntrenamientoData, paginacion::Pagina},
    services::{
        auth_service::UsuarioSesion,
        entrenamiento_service::{ActualizarEntrenamientoInput, CrearEntrenamientoInput, ListarEntrenamientosInput},
    },
    state::AppState,
    web::{LimiteQuery, RangoQuery},
};
use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};

pub async fn listar(
    State(state): State<AppState>,
    Query(input): Query<ListarEntrenamientosInput>,
) -> AppResult<Json<Pagina<EntrenamientoData>>> {
    Ok(Json(state.entrenamientos.listar(input).await?))
}

pub async fn proximos(
    State(state): State<AppState>,
    Query(q): Query<LimiteQuery>,
) -> AppResult<Json<Vec<EntrenamientoData>>> {
    Ok(Json(state.entrenamientos.proximos(q.limite).await?))
}

pub async fn por_rango(
    State(state): State<AppState>,
    Query(q): Query<RangoQuery>,
) -> AppResult<Json<Vec<EntrenamientoData>>> {
    Ok(Json(state.entrenamientos.por_rango(q.fecha_desde, q.fecha_hasta).await?))
}

pub async fn crear(
    State(state): State<AppState>,
    Extension(sesion): Extension<UsuarioSesion>,
    Json(input): Json<CrearEntrenamientoInput>,
) -> AppResult<(StatusCode, Json<EntrenamientoData>)> {
    let entrenamiento = state.entrenamientos.crear(input, sesion.usuario_id).await?;
    Ok((StatusCode::CREATED, Json(entrenamiento)))
}

pub async fn obtener(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<EntrenamientoData>> {
    Ok(Json(state.entrenamientos.obtener(id).await?))
}

pub async fn actualizar(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ActualizarEntrenamientoInput>,
) -> AppResult<Json<EntrenamientoData>> {
    Ok(Json(state.entrenamientos.actualizar(id, input).await?))
}

pub async fn eliminar(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    state.entrenamientos.eliminar(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
