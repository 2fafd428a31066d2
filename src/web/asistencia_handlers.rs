// src/web/asistencia_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::asistencia::{
        AsistenciaData, AsistenciasAgrupadas, EstadisticasAsistencia, EstadisticasComparativas, IdentificadorJugador,
    },
    services::{
        asistencia_service::{ActualizarAsistenciaInput, AsistenciaService, ConsultaEventoInput, RegistrarAsistenciaInput},
        auth_service::UsuarioSesion,
        estadisticas_service::{EstadisticasService, FiltroEstadisticasInput},
        parsear_rango,
    },
};
use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstadisticasQuery {
    tipo: Option<String>,
    fecha_desde: Option<String>,
    fecha_hasta: Option<String>,
}

impl EstadisticasQuery {
    fn into_filtro(self) -> AppResult<FiltroEstadisticasInput> {
        let (fecha_desde, fecha_hasta) = parsear_rango(self.fecha_desde.as_deref(), self.fecha_hasta.as_deref())?;
        Ok(FiltroEstadisticasInput { tipo: self.tipo, fecha_desde, fecha_hasta })
    }
}

/// Un jugador solo puede tocar sus propias asistencias; el gestor, cualquiera.
async fn exigir_asistencia_propia(servicio: &AsistenciaService, sesion: &UsuarioSesion, id: i64) -> AppResult<()> {
    if sesion.es_gestor() || servicio.es_de_usuario(id, sesion.usuario_id).await? {
        return Ok(());
    }
    tracing::warn!("Usuario {} intentó modificar la asistencia {}", sesion.usuario_id, id);
    Err(AppError::AccesoDenegado)
}

// POST /api/asistencias
// Un jugador puede omitir `jugador`: se entiende que se registra a sí mismo.
pub async fn registrar(
    State(servicio): State<Arc<AsistenciaService>>,
    Extension(sesion): Extension<UsuarioSesion>,
    Json(mut input): Json<RegistrarAsistenciaInput>,
) -> AppResult<(StatusCode, Json<AsistenciaData>)> {
    if !sesion.es_gestor() {
        let identificador = *input.jugador.get_or_insert(IdentificadorJugador::Usuario(sesion.usuario_id));
        if let Some(jugador) = servicio.resolver_jugador(identificador).await? {
            if jugador.usuario_id() != Some(sesion.usuario_id) {
                tracing::warn!("Usuario {} intentó registrar la asistencia del jugador {}", sesion.usuario_id, jugador.id());
                return Err(AppError::AccesoDenegado);
            }
        }
    }
    let asistencia = servicio.registrar(input).await?;
    Ok((StatusCode::CREATED, Json(asistencia)))
}

// PUT /api/asistencias/{id}
pub async fn actualizar_estado(
    State(servicio): State<Arc<AsistenciaService>>,
    Extension(sesion): Extension<UsuarioSesion>,
    Path(id): Path<i64>,
    Json(input): Json<ActualizarAsistenciaInput>,
) -> AppResult<Json<AsistenciaData>> {
    exigir_asistencia_propia(&servicio, &sesion, id).await?;
    Ok(Json(servicio.actualizar_estado(Some(id), input).await?))
}

// DELETE /api/asistencias/{id}
pub async fn eliminar(
    State(servicio): State<Arc<AsistenciaService>>,
    Extension(sesion): Extension<UsuarioSesion>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    exigir_asistencia_propia(&servicio, &sesion, id).await?;
    servicio.eliminar(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/asistencias/evento?partidoId= | ?entrenamientoId=
pub async fn por_evento(
    State(servicio): State<Arc<AsistenciaService>>,
    Query(consulta): Query<ConsultaEventoInput>,
) -> AppResult<Json<Vec<AsistenciaData>>> {
    Ok(Json(servicio.obtener_por_evento(consulta).await?))
}

// GET /api/asistencias/evento/agrupadas
pub async fn agrupadas(
    State(servicio): State<Arc<AsistenciaService>>,
    Query(consulta): Query<ConsultaEventoInput>,
) -> AppResult<Json<AsistenciasAgrupadas>> {
    Ok(Json(servicio.obtener_agrupadas(consulta).await?))
}

// GET /api/asistencias/evento/resumen
pub async fn resumen(
    State(servicio): State<Arc<AsistenciaService>>,
    Query(consulta): Query<ConsultaEventoInput>,
) -> AppResult<Json<EstadisticasAsistencia>> {
    Ok(Json(servicio.obtener_resumen(consulta).await?))
}

// GET /api/asistencias/jugadores/{id}/estadisticas?tipo=&fechaDesde=&fechaHasta=
pub async fn estadisticas(
    State(servicio): State<Arc<EstadisticasService>>,
    Path(jugador_id): Path<i64>,
    Query(q): Query<EstadisticasQuery>,
) -> AppResult<Json<EstadisticasAsistencia>> {
    Ok(Json(servicio.estadisticas_jugador(Some(jugador_id), q.into_filtro()?).await?))
}

// GET /api/asistencias/jugadores/{id}/comparativas
pub async fn comparativas(
    State(servicio): State<Arc<EstadisticasService>>,
    Path(jugador_id): Path<i64>,
    Query(q): Query<EstadisticasQuery>,
) -> AppResult<Json<EstadisticasComparativas>> {
    Ok(Json(servicio.comparativas(Some(jugador_id), q.into_filtro()?).await?))
}

// GET /api/asistencias/jugadores/{id}/historial
pub async fn historial(
    State(servicio): State<Arc<EstadisticasService>>,
    Path(jugador_id): Path<i64>,
    Query(q): Query<EstadisticasQuery>,
) -> AppResult<Json<Vec<AsistenciaData>>> {
    Ok(Json(servicio.historial(Some(jugador_id), q.into_filtro()?).await?))
}
