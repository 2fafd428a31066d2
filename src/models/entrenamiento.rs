// src/models/entrenamiento.rs
use crate::error::AppResult;
use crate::models::validacion::{requerir_texto, validar_duracion, validar_id_positivo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DURACION_POR_DEFECTO: i64 = 90;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrenamientoData {
    pub id: i64,
    pub fecha_hora: DateTime<Utc>,
    pub lugar: String,
    pub descripcion: Option<String>,
    pub duracion_minutos: i64,
    pub creado_por: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Entrenamiento {
    id: i64,
    fecha_hora: DateTime<Utc>,
    lugar: String,
    descripcion: Option<String>,
    duracion_minutos: i64,
    creado_por: i64,
    created_at: DateTime<Utc>,
}

impl Entrenamiento {
    /// `duracion_minutos` ausente toma el valor por defecto (90).
    pub fn new(
        fecha_hora: DateTime<Utc>,
        lugar: &str,
        descripcion: Option<String>,
        duracion_minutos: Option<i64>,
        creado_por: i64,
    ) -> AppResult<Self> {
        requerir_texto("lugar", lugar)?;
        let duracion = duracion_minutos.unwrap_or(DURACION_POR_DEFECTO);
        validar_duracion(duracion)?;
        validar_id_positivo("creadoPor", creado_por)?;
        let mut entrenamiento = Self {
            id: 0,
            fecha_hora,
            lugar: lugar.trim().to_string(),
            descripcion: None,
            duracion_minutos: duracion,
            creado_por,
            created_at: Utc::now(),
        };
        entrenamiento.cambiar_descripcion(descripcion);
        Ok(entrenamiento)
    }

    pub fn rehidratar(data: EntrenamientoData) -> AppResult<Self> {
        requerir_texto("lugar", &data.lugar)?;
        validar_duracion(data.duracion_minutos)?;
        Ok(Self {
            id: data.id,
            fecha_hora: data.fecha_hora,
            lugar: data.lugar,
            descripcion: data.descripcion,
            duracion_minutos: data.duracion_minutos,
            creado_por: data.creado_por,
            created_at: data.created_at,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn fecha_hora(&self) -> DateTime<Utc> {
        self.fecha_hora
    }

    pub fn lugar(&self) -> &str {
        &self.lugar
    }

    pub fn descripcion(&self) -> Option<&str> {
        self.descripcion.as_deref()
    }

    pub fn duracion_minutos(&self) -> i64 {
        self.duracion_minutos
    }

    pub fn creado_por(&self) -> i64 {
        self.creado_por
    }

    pub fn reprogramar(&mut self, fecha_hora: DateTime<Utc>) {
        self.fecha_hora = fecha_hora;
    }

    pub fn cambiar_lugar(&mut self, lugar: &str) -> AppResult<()> {
        requerir_texto("lugar", lugar)?;
        self.lugar = lugar.trim().to_string();
        Ok(())
    }

    pub fn cambiar_descripcion(&mut self, descripcion: Option<String>) {
        self.descripcion = descripcion
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
    }

    pub fn cambiar_duracion(&mut self, minutos: i64) -> AppResult<()> {
        validar_duracion(minutos)?;
        self.duracion_minutos = minutos;
        Ok(())
    }

    pub fn to_object(&self) -> EntrenamientoData {
        EntrenamientoData {
            id: self.id,
            fecha_hora: self.fecha_hora,
            lugar: self.lugar.clone(),
            descripcion: self.descripcion.clone(),
            duracion_minutos: self.duracion_minutos,
            creado_por: self.creado_por,
            created_at: self.created_at,
        }
    }
}
