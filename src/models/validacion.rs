// src/models/validacion.rs
//! Primitivas de validación compartidas por las entidades.
//!
//! Todas devuelven `AppError::Validacion` con un mensaje listo para el cliente.

use crate::error::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

pub const DORSAL_MIN: i64 = 0;
pub const DORSAL_MAX: i64 = 99;
pub const DURACION_MIN: i64 = 15;
pub const DURACION_MAX: i64 = 240;
pub const NOMBRE_MIN: usize = 2;
pub const NOMBRE_MAX: usize = 100;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    // Formato internacional: "+" seguido de 10 a 15 dígitos ASCII
    static ref TELEFONO_RE: Regex = Regex::new(r"^\+[0-9]{10,15}$").unwrap();
    static ref RESULTADO_RE: Regex = Regex::new(r"^[0-9]+-[0-9]+$").unwrap();
}

pub fn validar_email(email: &str) -> AppResult<()> {
    if email.trim().is_empty() {
        return Err(AppError::validacion("email es requerido"));
    }
    if !EMAIL_RE.is_match(email.trim()) {
        return Err(AppError::validacion("email no tiene un formato válido"));
    }
    Ok(())
}

pub fn validar_nombre(nombre: &str) -> AppResult<()> {
    let largo = nombre.trim().chars().count();
    if largo == 0 {
        return Err(AppError::validacion("nombre es requerido"));
    }
    if !(NOMBRE_MIN..=NOMBRE_MAX).contains(&largo) {
        return Err(AppError::validacion(format!(
            "nombre debe tener entre {} y {} caracteres",
            NOMBRE_MIN, NOMBRE_MAX
        )));
    }
    Ok(())
}

pub fn validar_telefono(telefono: &str) -> AppResult<()> {
    if !TELEFONO_RE.is_match(telefono) {
        return Err(AppError::validacion(
            "telefono debe tener formato internacional (+ seguido de 10 a 15 dígitos)",
        ));
    }
    Ok(())
}

pub fn validar_dorsal(dorsal: i64) -> AppResult<()> {
    if !(DORSAL_MIN..=DORSAL_MAX).contains(&dorsal) {
        return Err(AppError::validacion(format!(
            "numeroDorsal debe estar entre {} y {}",
            DORSAL_MIN, DORSAL_MAX
        )));
    }
    Ok(())
}

pub fn validar_duracion(minutos: i64) -> AppResult<()> {
    if !(DURACION_MIN..=DURACION_MAX).contains(&minutos) {
        return Err(AppError::validacion(format!(
            "duracionMinutos debe estar entre {} y {}",
            DURACION_MIN, DURACION_MAX
        )));
    }
    Ok(())
}

/// Texto obligatorio: no vacío tras recortar espacios.
pub fn requerir_texto(campo: &str, valor: &str) -> AppResult<()> {
    if valor.trim().is_empty() {
        return Err(AppError::validacion(format!("{} es requerido", campo)));
    }
    Ok(())
}

pub fn validar_id_positivo(campo: &str, id: i64) -> AppResult<()> {
    if id <= 0 {
        return Err(AppError::validacion(format!("{} debe ser un id válido", campo)));
    }
    Ok(())
}

/// Resultado de partido con formato estricto "<goles>-<goles>", ya recortado.
pub fn normalizar_resultado(resultado: &str) -> AppResult<String> {
    let limpio = resultado.trim();
    if limpio.is_empty() {
        return Err(AppError::validacion("resultado es requerido"));
    }
    if !RESULTADO_RE.is_match(limpio) {
        return Err(AppError::validacion(
            "resultado debe tener el formato \"goles-goles\" (ej: 2-1)",
        ));
    }
    Ok(limpio.to_string())
}

/// Acepta RFC 3339 ("2025-03-01T18:30:00Z") o fecha-hora sin zona, que se toma como UTC.
pub fn parsear_fecha_hora(campo: &str, valor: &str) -> AppResult<DateTime<Utc>> {
    let valor = valor.trim();
    if valor.is_empty() {
        return Err(AppError::validacion(format!("{} es requerido", campo)));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(valor) {
        return Ok(dt.with_timezone(&Utc));
    }
    for formato in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(valor, formato) {
            return Ok(naive.and_utc());
        }
    }
    Err(AppError::validacion(format!("{} no es una fecha válida", campo)))
}

/// Como `parsear_fecha_hora`, pero también admite una fecha sola (medianoche UTC).
pub fn parsear_fecha_filtro(campo: &str, valor: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(fecha) = NaiveDate::parse_from_str(valor.trim(), "%Y-%m-%d") {
        if let Some(naive) = fecha.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    parsear_fecha_hora(campo, valor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(validar_email("ana@club.es").is_ok());
        assert!(validar_email("ana@club").is_err());
        assert!(validar_email("ana club@x.es").is_err());
        assert!(validar_email("   ").is_err());
    }

    #[test]
    fn test_telefono_shape() {
        assert!(validar_telefono("+34600111222").is_ok());
        assert!(validar_telefono("600111222").is_err());
        assert!(validar_telefono("+123").is_err());
        assert!(validar_telefono("+1234567890123456").is_err());
        // Dígitos no ASCII (devanagari)
        assert!(validar_telefono("+९१२३४५६७८९०").is_err());
    }

    #[test]
    fn test_ranges() {
        assert!(validar_dorsal(0).is_ok());
        assert!(validar_dorsal(99).is_ok());
        assert!(validar_dorsal(100).is_err());
        assert!(validar_dorsal(-1).is_err());
        assert!(validar_duracion(15).is_ok());
        assert!(validar_duracion(240).is_ok());
        assert!(validar_duracion(14).is_err());
        assert!(validar_duracion(241).is_err());
    }

    #[test]
    fn test_nombre_length_counts_chars() {
        assert!(validar_nombre("Íñ").is_ok());
        assert!(validar_nombre("A").is_err());
        assert!(validar_nombre(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_fecha_hora_formats() {
        let a = parsear_fecha_hora("fechaHora", "2025-03-01T18:30:00Z").unwrap();
        let b = parsear_fecha_hora("fechaHora", "2025-03-01T19:30:00+01:00").unwrap();
        let c = parsear_fecha_hora("fechaHora", "2025-03-01T18:30").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert!(parsear_fecha_hora("fechaHora", "mañana").is_err());
        assert!(parsear_fecha_hora("fechaHora", "").is_err());
        assert!(parsear_fecha_filtro("fechaDesde", "2025-03-01").is_ok());
    }

    #[test]
    fn test_resultado_is_trimmed_and_strict() {
        assert_eq!(normalizar_resultado("  3-1 ").unwrap(), "3-1");
        assert!(normalizar_resultado("3 - 1").is_err());
        assert!(normalizar_resultado("3-").is_err());
        assert!(normalizar_resultado("a-b").is_err());
        // Dígitos arábigo-índicos
        assert!(normalizar_resultado("٣-١").is_err());
    }
}
