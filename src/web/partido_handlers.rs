// src/web/partido_handlers.rs
use crate::{
    error::AppResult,
    models::{paginacion::Pagina, partido::PartidoData},
    services::{
        auth_service::UsuarioSesion,
        partido_service::{ActualizarPartidoInput, CrearPartidoInput, ListarPartidosInput},
    },
    state::AppState,
    web::{LimiteQuery, RangoQuery},
};
use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ResultadoBody {
    resultado: Option<String>,
}

// GET /api/partidos?tipo=&fechaDesde=&fechaHasta=&pagina=&porPagina=
pub async fn listar(
    State(state): State<AppState>,
    Query(input): Query<ListarPartidosInput>,
) -> AppResult<Json<Pagina<PartidoData>>> {
    Ok(Json(state.partidos.listar(input).await?))
}

// GET /api/partidos/proximos?limite=
pub async fn proximos(
    State(state): State<AppState>,
    Query(q): Query<LimiteQuery>,
) -> AppResult<Json<Vec<PartidoData>>> {
    Ok(Json(state.partidos.proximos(q.limite).await?))
}

// GET /api/partidos/rango?fechaDesde=&fechaHasta=
pub async fn por_rango(
    State(state): State<AppState>,
    Query(q): Query<RangoQuery>,
) -> AppResult<Json<Vec<PartidoData>>> {
    Ok(Json(state.partidos.por_rango(q.fecha_desde, q.fecha_hasta).await?))
}

// POST /api/partidos (gestor)
pub async fn crear(
    State(state): State<AppState>,
    Extension(sesion): Extension<UsuarioSesion>,
    Json(input): Json<CrearPartidoInput>,
) -> AppResult<(StatusCode, Json<PartidoData>)> {
    let partido = state.partidos.crear(input, sesion.usuario_id).await?;
    Ok((StatusCode::CREATED, Json(partido)))
}

// GET /api/partidos/{id}
pub async fn obtener(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<PartidoData>> {
    Ok(Json(state.partidos.obtener(id).await?))
}

// PUT /api/partidos/{id} (gestor)
pub async fn actualizar(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ActualizarPartidoInput>,
) -> AppResult<Json<PartidoData>> {
    Ok(Json(state.partidos.actualizar(id, input).await?))
}

// DELETE /api/partidos/{id} (gestor)
pub async fn eliminar(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    state.partidos.eliminar(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/partidos/{id}/resultado (gestor)
pub async fn registrar_resultado(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<ResultadoBody>,
) -> AppResult<Json<PartidoData>> {
    Ok(Json(state.partidos.registrar_resultado(id, body.resultado).await?))
}
