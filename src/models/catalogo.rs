// src/models/catalogo.rs
use serde::Serialize;
use sqlx::FromRow;

// Catálogos de solo lectura, sembrados por la migración inicial.

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Posicion {
    pub id: i64,
    pub nombre: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MotivoAusencia {
    pub id: i64,
    pub descripcion: String,
}
