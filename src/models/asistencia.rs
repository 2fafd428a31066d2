// src/models/asistencia.rs
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// --- Estados y tipos ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstadoAsistencia {
    Confirmado,
    Ausente,
    Pendiente,
}

impl EstadoAsistencia {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoAsistencia::Confirmado => "confirmado",
            EstadoAsistencia::Ausente => "ausente",
            EstadoAsistencia::Pendiente => "pendiente",
        }
    }
}

impl fmt::Display for EstadoAsistencia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstadoAsistencia {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmado" => Ok(EstadoAsistencia::Confirmado),
            "ausente" => Ok(EstadoAsistencia::Ausente),
            "pendiente" => Ok(EstadoAsistencia::Pendiente),
            otro => Err(AppError::validacion(format!(
                "estado '{}' no es válido (confirmado, ausente, pendiente)",
                otro
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoEvento {
    Partido,
    Entrenamiento,
}

impl TipoEvento {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoEvento::Partido => "partido",
            TipoEvento::Entrenamiento => "entrenamiento",
        }
    }
}

impl FromStr for TipoEvento {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "partido" => Ok(TipoEvento::Partido),
            "entrenamiento" => Ok(TipoEvento::Entrenamiento),
            otro => Err(AppError::validacion(format!(
                "tipo '{}' no es válido (partido, entrenamiento)",
                otro
            ))),
        }
    }
}

/// El evento al que apunta una asistencia: siempre exactamente uno.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventoAsistencia {
    Partido(i64),
    Entrenamiento(i64),
}

impl EventoAsistencia {
    /// Traduce el par de ids opcionales de la entrada; falla si vienen ambos o ninguno.
    pub fn desde_ids(partido_id: Option<i64>, entrenamiento_id: Option<i64>) -> AppResult<Self> {
        match (partido_id, entrenamiento_id) {
            (Some(p), None) => Ok(EventoAsistencia::Partido(p)),
            (None, Some(e)) => Ok(EventoAsistencia::Entrenamiento(e)),
            (Some(_), Some(_)) => Err(AppError::validacion(
                "Solo se puede indicar partidoId o entrenamientoId, no ambos",
            )),
            (None, None) => Err(AppError::validacion(
                "Se requiere partidoId o entrenamientoId",
            )),
        }
    }

    pub fn tipo(&self) -> TipoEvento {
        match self {
            EventoAsistencia::Partido(_) => TipoEvento::Partido,
            EventoAsistencia::Entrenamiento(_) => TipoEvento::Entrenamiento,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            EventoAsistencia::Partido(id) | EventoAsistencia::Entrenamiento(id) => *id,
        }
    }

    pub fn partido_id(&self) -> Option<i64> {
        match self {
            EventoAsistencia::Partido(id) => Some(*id),
            EventoAsistencia::Entrenamiento(_) => None,
        }
    }

    pub fn entrenamiento_id(&self) -> Option<i64> {
        match self {
            EventoAsistencia::Entrenamiento(id) => Some(*id),
            EventoAsistencia::Partido(_) => None,
        }
    }
}

/// Cómo identifica el cliente al jugador: `{"por": "usuario", "id": 3}` o `{"por": "jugador", "id": 8}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "por", content = "id", rename_all = "lowercase")]
pub enum IdentificadorJugador {
    Usuario(i64),
    Jugador(i64),
}

// --- Registro de asistencia ---

#[derive(Debug, Clone, PartialEq)]
pub struct Asistencia {
    pub id: i64,
    pub jugador_id: i64,
    pub evento: EventoAsistencia,
    pub estado: EstadoAsistencia,
    pub motivo_ausencia_id: Option<i64>,
    pub comentario: Option<String>,
    pub fecha_respuesta: DateTime<Utc>,
}

impl Asistencia {
    pub fn to_object(&self) -> AsistenciaData {
        AsistenciaData {
            id: self.id,
            jugador_id: self.jugador_id,
            partido_id: self.evento.partido_id(),
            entrenamiento_id: self.evento.entrenamiento_id(),
            estado: self.estado,
            motivo_ausencia_id: self.motivo_ausencia_id,
            comentario: self.comentario.clone(),
            fecha_respuesta: self.fecha_respuesta,
        }
    }
}

/// Forma plana hacia los clientes, con los dos ids de evento como en el almacenamiento.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AsistenciaData {
    pub id: i64,
    pub jugador_id: i64,
    pub partido_id: Option<i64>,
    pub entrenamiento_id: Option<i64>,
    pub estado: EstadoAsistencia,
    pub motivo_ausencia_id: Option<i64>,
    pub comentario: Option<String>,
    pub fecha_respuesta: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NuevaAsistencia {
    pub jugador_id: i64,
    pub evento: EventoAsistencia,
    pub estado: EstadoAsistencia,
    pub motivo_ausencia_id: Option<i64>,
    pub comentario: Option<String>,
}

// --- Agregados ---

#[derive(Debug, Clone, Default, Serialize)]
pub struct AsistenciasAgrupadas {
    pub confirmados: Vec<AsistenciaData>,
    pub ausentes: Vec<AsistenciaData>,
    pub pendientes: Vec<AsistenciaData>,
}

impl AsistenciasAgrupadas {
    pub fn agrupar(asistencias: &[Asistencia]) -> Self {
        let mut grupos = Self::default();
        for asistencia in asistencias {
            let data = asistencia.to_object();
            match asistencia.estado {
                EstadoAsistencia::Confirmado => grupos.confirmados.push(data),
                EstadoAsistencia::Ausente => grupos.ausentes.push(data),
                EstadoAsistencia::Pendiente => grupos.pendientes.push(data),
            }
        }
        grupos
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstadisticasAsistencia {
    pub total: i64,
    pub confirmados: i64,
    pub ausentes: i64,
    pub pendientes: i64,
    pub porcentaje_asistencia: i64,
}

impl EstadisticasAsistencia {
    pub fn desde_conteos(confirmados: i64, ausentes: i64, pendientes: i64) -> Self {
        let total = confirmados + ausentes + pendientes;
        Self {
            total,
            confirmados,
            ausentes,
            pendientes,
            porcentaje_asistencia: porcentaje(confirmados, total),
        }
    }

    pub fn desde_asistencias(asistencias: &[Asistencia]) -> Self {
        let contar = |estado| asistencias.iter().filter(|a| a.estado == estado).count() as i64;
        Self::desde_conteos(
            contar(EstadoAsistencia::Confirmado),
            contar(EstadoAsistencia::Ausente),
            contar(EstadoAsistencia::Pendiente),
        )
    }

    /// Suma los conteos y recalcula el porcentaje sobre el total combinado
    /// (no se promedian los porcentajes parciales).
    pub fn combinar(&self, otra: &EstadisticasAsistencia) -> Self {
        Self::desde_conteos(
            self.confirmados + otra.confirmados,
            self.ausentes + otra.ausentes,
            self.pendientes + otra.pendientes,
        )
    }
}

/// round(confirmados / total * 100); 0 cuando no hay registros.
pub fn porcentaje(confirmados: i64, total: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    ((confirmados as f64 / total as f64) * 100.0).round() as i64
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EstadisticasComparativas {
    pub partidos: EstadisticasAsistencia,
    pub entrenamientos: EstadisticasAsistencia,
    pub global: EstadisticasAsistencia,
}

#[derive(Debug, Clone, Default)]
pub struct FiltroAsistencias {
    pub tipo: Option<TipoEvento>,
    pub fecha_desde: Option<DateTime<Utc>>,
    pub fecha_hasta: Option<DateTime<Utc>>,
}
