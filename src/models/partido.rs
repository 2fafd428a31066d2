// src/models/partido.rs
use crate::error::{AppError, AppResult};
use crate::models::validacion::{normalizar_resultado, requerir_texto, validar_id_positivo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoPartido {
    Liga,
    Amistoso,
    Copa,
    Torneo,
}

impl TipoPartido {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoPartido::Liga => "liga",
            TipoPartido::Amistoso => "amistoso",
            TipoPartido::Copa => "copa",
            TipoPartido::Torneo => "torneo",
        }
    }
}

impl FromStr for TipoPartido {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "liga" => Ok(TipoPartido::Liga),
            "amistoso" => Ok(TipoPartido::Amistoso),
            "copa" => Ok(TipoPartido::Copa),
            "torneo" => Ok(TipoPartido::Torneo),
            otro => Err(AppError::validacion(format!(
                "tipo '{}' no es válido (liga, amistoso, copa, torneo)",
                otro
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartidoData {
    pub id: i64,
    pub fecha_hora: DateTime<Utc>,
    pub rival: String,
    pub lugar: String,
    pub tipo: TipoPartido,
    pub es_local: bool,
    pub creado_por: i64,
    pub resultado: Option<String>,
    pub observaciones: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Partido {
    id: i64,
    fecha_hora: DateTime<Utc>,
    rival: String,
    lugar: String,
    tipo: TipoPartido,
    es_local: bool,
    creado_por: i64,
    resultado: Option<String>,
    observaciones: Option<String>,
    created_at: DateTime<Utc>,
}

impl Partido {
    pub fn new(
        fecha_hora: DateTime<Utc>,
        rival: &str,
        lugar: &str,
        tipo: TipoPartido,
        es_local: bool,
        creado_por: i64,
    ) -> AppResult<Self> {
        requerir_texto("rival", rival)?;
        requerir_texto("lugar", lugar)?;
        validar_id_positivo("creadoPor", creado_por)?;
        Ok(Self {
            id: 0,
            fecha_hora,
            rival: rival.trim().to_string(),
            lugar: lugar.trim().to_string(),
            tipo,
            es_local,
            creado_por,
            resultado: None,
            observaciones: None,
            created_at: Utc::now(),
        })
    }

    pub fn rehidratar(data: PartidoData) -> AppResult<Self> {
        requerir_texto("rival", &data.rival)?;
        requerir_texto("lugar", &data.lugar)?;
        Ok(Self {
            id: data.id,
            fecha_hora: data.fecha_hora,
            rival: data.rival,
            lugar: data.lugar,
            tipo: data.tipo,
            es_local: data.es_local,
            creado_por: data.creado_por,
            resultado: data.resultado,
            observaciones: data.observaciones,
            created_at: data.created_at,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn fecha_hora(&self) -> DateTime<Utc> {
        self.fecha_hora
    }

    pub fn rival(&self) -> &str {
        &self.rival
    }

    pub fn lugar(&self) -> &str {
        &self.lugar
    }

    pub fn tipo(&self) -> TipoPartido {
        self.tipo
    }

    pub fn es_local(&self) -> bool {
        self.es_local
    }

    pub fn creado_por(&self) -> i64 {
        self.creado_por
    }

    pub fn resultado(&self) -> Option<&str> {
        self.resultado.as_deref()
    }

    pub fn observaciones(&self) -> Option<&str> {
        self.observaciones.as_deref()
    }

    pub fn reprogramar(&mut self, fecha_hora: DateTime<Utc>) {
        self.fecha_hora = fecha_hora;
    }

    pub fn cambiar_rival(&mut self, rival: &str) -> AppResult<()> {
        requerir_texto("rival", rival)?;
        self.rival = rival.trim().to_string();
        Ok(())
    }

    pub fn cambiar_lugar(&mut self, lugar: &str) -> AppResult<()> {
        requerir_texto("lugar", lugar)?;
        self.lugar = lugar.trim().to_string();
        Ok(())
    }

    pub fn cambiar_tipo(&mut self, tipo: TipoPartido) {
        self.tipo = tipo;
    }

    pub fn cambiar_condicion(&mut self, es_local: bool) {
        self.es_local = es_local;
    }

    pub fn actualizar_observaciones(&mut self, observaciones: Option<String>) {
        self.observaciones = observaciones
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty());
    }

    /// Registra (o corrige, si `permitir_correccion`) el resultado "goles-goles".
    pub fn registrar_resultado(&mut self, resultado: &str, permitir_correccion: bool) -> AppResult<()> {
        let resultado = normalizar_resultado(resultado)?;
        if self.resultado.is_some() && !permitir_correccion {
            return Err(AppError::validacion("El partido ya tiene un resultado registrado"));
        }
        self.resultado = Some(resultado);
        Ok(())
    }

    pub fn to_object(&self) -> PartidoData {
        PartidoData {
            id: self.id,
            fecha_hora: self.fecha_hora,
            rival: self.rival.clone(),
            lugar: self.lugar.clone(),
            tipo: self.tipo,
            es_local: self.es_local,
            creado_por: self.creado_por,
            resultado: self.resultado.clone(),
            observaciones: self.observaciones.clone(),
            created_at: self.created_at,
        }
    }
}
