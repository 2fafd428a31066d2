// src/services/estadisticas_service.rs
//! Estadísticas de asistencia por jugador: por tipo de evento, comparativas e historial.

use crate::{
    error::{AppError, AppResult},
    models::asistencia::{
        Asistencia, AsistenciaData, EstadisticasAsistencia, EstadisticasComparativas, FiltroAsistencias, TipoEvento,
    },
    repositories::{AsistenciaRepository, JugadorRepository},
    services::requerido,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct FiltroEstadisticasInput {
    pub tipo: Option<String>,
    pub fecha_desde: Option<DateTime<Utc>>,
    pub fecha_hasta: Option<DateTime<Utc>>,
}

pub struct EstadisticasService {
    asistencias: Arc<dyn AsistenciaRepository>,
    jugadores: Arc<dyn JugadorRepository>,
}

impl EstadisticasService {
    pub fn new(asistencias: Arc<dyn AsistenciaRepository>, jugadores: Arc<dyn JugadorRepository>) -> Self {
        Self { asistencias, jugadores }
    }

    /// Comprueba jugador, tipo y rango, y devuelve el id junto al filtro ya tipado.
    async fn preparar(&self, jugador_id: Option<i64>, filtro: FiltroEstadisticasInput) -> AppResult<(i64, FiltroAsistencias)> {
        let jugador_id = requerido("jugadorId", jugador_id)?;
        if self.jugadores.buscar_por_id(jugador_id).await?.is_none() {
            return Err(AppError::validacion("Jugador no encontrado"));
        }
        let tipo = filtro.tipo.as_deref().map(str::parse::<TipoEvento>).transpose()?;
        if let (Some(desde), Some(hasta)) = (filtro.fecha_desde, filtro.fecha_hasta) {
            if desde > hasta {
                return Err(AppError::validacion("fechaDesde no puede ser posterior a fechaHasta"));
            }
        }
        tracing::debug!("Estadísticas del jugador {} (tipo {:?})", jugador_id, tipo);
        Ok((
            jugador_id,
            FiltroAsistencias { tipo, fecha_desde: filtro.fecha_desde, fecha_hasta: filtro.fecha_hasta },
        ))
    }

    async fn por_tipo(
        &self,
        jugador_id: i64,
        tipo: TipoEvento,
        filtro: &FiltroAsistencias,
    ) -> AppResult<EstadisticasAsistencia> {
        self.asistencias.estadisticas_por_jugador(jugador_id, tipo, filtro).await
    }

    /// Sin tipo se suman partidos y entrenamientos y el porcentaje se recalcula sobre el total.
    pub async fn estadisticas_jugador(
        &self,
        jugador_id: Option<i64>,
        filtro: FiltroEstadisticasInput,
    ) -> AppResult<EstadisticasAsistencia> {
        let (jugador_id, filtro) = self.preparar(jugador_id, filtro).await?;
        match filtro.tipo {
            Some(tipo) => self.por_tipo(jugador_id, tipo, &filtro).await,
            None => {
                let partidos = self.por_tipo(jugador_id, TipoEvento::Partido, &filtro).await?;
                let entrenamientos = self.por_tipo(jugador_id, TipoEvento::Entrenamiento, &filtro).await?;
                Ok(partidos.combinar(&entrenamientos))
            }
        }
    }

    /// El tipo del filtro no aplica: siempre se devuelven los dos y el global.
    pub async fn comparativas(
        &self,
        jugador_id: Option<i64>,
        filtro: FiltroEstadisticasInput,
    ) -> AppResult<EstadisticasComparativas> {
        let (jugador_id, filtro) = self.preparar(jugador_id, filtro).await?;
        let partidos = self.por_tipo(jugador_id, TipoEvento::Partido, &filtro).await?;
        let entrenamientos = self.por_tipo(jugador_id, TipoEvento::Entrenamiento, &filtro).await?;
        Ok(EstadisticasComparativas { partidos, entrenamientos, global: partidos.combinar(&entrenamientos) })
    }

    pub async fn historial(
        &self,
        jugador_id: Option<i64>,
        filtro: FiltroEstadisticasInput,
    ) -> AppResult<Vec<AsistenciaData>> {
        let (jugador_id, filtro) = self.preparar(jugador_id, filtro).await?;
        let asistencias = self.asistencias.listar_por_jugador(jugador_id, &filtro).await?;
        Ok(asistencias.iter().map(Asistencia::to_object).collect())
    }
}
