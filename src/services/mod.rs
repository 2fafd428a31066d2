// src/services/mod.rs
pub mod asistencia_service;
pub mod auth_service;
pub mod entrenamiento_service;
pub mod estadisticas_service;
pub mod jugador_service;
pub mod partido_service;
pub mod usuario_service;

use crate::{
    error::{AppError, AppResult},
    models::validacion::parsear_fecha_filtro,
};
use chrono::{DateTime, Utc};

/// Campo obligatorio de una entrada: `None` es "<campo> es requerido".
pub(crate) fn requerido<T>(campo: &str, valor: Option<T>) -> AppResult<T> {
    valor.ok_or_else(|| AppError::validacion(format!("{} es requerido", campo)))
}

/// Rango de fechas opcional de los filtros; exige `desde <= hasta` si vienen los dos.
pub(crate) fn parsear_rango(
    desde: Option<&str>,
    hasta: Option<&str>,
) -> AppResult<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    let desde = desde.map(|d| parsear_fecha_filtro("fechaDesde", d)).transpose()?;
    let hasta = hasta.map(|h| parsear_fecha_filtro("fechaHasta", h)).transpose()?;
    if let (Some(d), Some(h)) = (desde, hasta) {
        if d > h {
            return Err(AppError::validacion("fechaDesde no puede ser posterior a fechaHasta"));
        }
    }
    Ok((desde, hasta))
}

/// Igual que `parsear_rango`, con los dos límites obligatorios.
pub(crate) fn parsear_rango_requerido(
    desde: Option<String>,
    hasta: Option<String>,
) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let desde = parsear_fecha_filtro("fechaDesde", &requerido("fechaDesde", desde)?)?;
    let hasta = parsear_fecha_filtro("fechaHasta", &requerido("fechaHasta", hasta)?)?;
    if desde > hasta {
        return Err(AppError::validacion("fechaDesde no puede ser posterior a fechaHasta"));
    }
    Ok((desde, hasta))
}

/// Cuántos eventos devuelve "próximos" si no se indica, y el máximo admitido.
pub const PROXIMOS_DEFECTO: i64 = 5;
pub const PROXIMOS_MAX: i64 = 50;

pub(crate) fn validar_limite(limite: Option<i64>) -> AppResult<i64> {
    let limite = limite.unwrap_or(PROXIMOS_DEFECTO);
    if !(1..=PROXIMOS_MAX).contains(&limite) {
        return Err(AppError::validacion(format!("limite debe estar entre 1 y {}", PROXIMOS_MAX)));
    }
    Ok(limite)
}
