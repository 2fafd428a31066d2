// src/web/jugador_handlers.rs
use crate::{
    error::AppResult,
    models::{
        jugador::{JugadorData, NuevoJugador},
        paginacion::Pagina,
    },
    services::{
        auth_service::UsuarioSesion,
        jugador_service::{DatosPersonalesInput, ListarJugadoresInput},
    },
    state::AppState,
    web::exigir_gestor_o_propietario,
};
use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DorsalBody {
    numero_dorsal: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosicionBody {
    posicion_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VincularBody {
    usuario_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ContactoBody {
    telefono: Option<String>,
}

// GET /api/jugadores?posicionId=&pagina=&porPagina=
pub async fn listar(
    State(state): State<AppState>,
    Query(input): Query<ListarJugadoresInput>,
) -> AppResult<Json<Pagina<JugadorData>>> {
    Ok(Json(state.jugadores.listar(input).await?))
}

// GET /api/posiciones/{id}/jugadores
pub async fn listar_por_posicion(
    State(state): State<AppState>,
    Path(posicion_id): Path<i64>,
) -> AppResult<Json<Vec<JugadorData>>> {
    Ok(Json(state.jugadores.listar_por_posicion(posicion_id).await?))
}

// POST /api/jugadores (gestor)
pub async fn crear(
    State(state): State<AppState>,
    Json(datos): Json<NuevoJugador>,
) -> AppResult<(StatusCode, Json<JugadorData>)> {
    let jugador = state.jugadores.crear(datos).await?;
    Ok((StatusCode::CREATED, Json(jugador)))
}

// GET /api/jugadores/{id}
pub async fn obtener(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<JugadorData>> {
    Ok(Json(state.jugadores.obtener(id).await?))
}

// GET /api/jugadores/usuario/{usuario_id}
pub async fn obtener_por_usuario(
    State(state): State<AppState>,
    Path(usuario_id): Path<i64>,
) -> AppResult<Json<JugadorData>> {
    Ok(Json(state.jugadores.obtener_por_usuario(usuario_id).await?))
}

// DELETE /api/jugadores/{id} (gestor)
pub async fn eliminar(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    state.jugadores.eliminar(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/jugadores/{id}/dorsal (gestor); null libera el dorsal
pub async fn asignar_dorsal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<DorsalBody>,
) -> AppResult<Json<JugadorData>> {
    Ok(Json(state.jugadores.asignar_dorsal(id, body.numero_dorsal).await?))
}

// PUT /api/jugadores/{id}/posicion (gestor)
pub async fn cambiar_posicion(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<PosicionBody>,
) -> AppResult<Json<JugadorData>> {
    Ok(Json(state.jugadores.cambiar_posicion(id, body.posicion_id).await?))
}

// PUT /api/jugadores/{id}/usuario (gestor)
pub async fn vincular_usuario(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<VincularBody>,
) -> AppResult<Json<JugadorData>> {
    Ok(Json(state.jugadores.vincular_usuario(id, body.usuario_id).await?))
}

// PUT /api/jugadores/{id}/contacto (gestor o el propio jugador)
pub async fn actualizar_contacto(
    State(state): State<AppState>,
    Extension(sesion): Extension<UsuarioSesion>,
    Path(id): Path<i64>,
    Json(body): Json<ContactoBody>,
) -> AppResult<Json<JugadorData>> {
    let jugador = state.jugadores.obtener(id).await?;
    exigir_gestor_o_propietario(&sesion, jugador.usuario_id)?;
    Ok(Json(state.jugadores.actualizar_contacto(id, body.telefono).await?))
}

// PUT /api/jugadores/{id}/datos (gestor o el propio jugador)
pub async fn actualizar_datos_personales(
    State(state): State<AppState>,
    Extension(sesion): Extension<UsuarioSesion>,
    Path(id): Path<i64>,
    Json(input): Json<DatosPersonalesInput>,
) -> AppResult<Json<JugadorData>> {
    let jugador = state.jugadores.obtener(id).await?;
    exigir_gestor_o_propietario(&sesion, jugador.usuario_id)?;
    Ok(Json(state.jugadores.actualizar_datos_personales(id, input).await?))
}
