// src/services/partido_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        paginacion::{Pagina, Paginacion},
        partido::{Partido, PartidoData, TipoPartido},
        validacion::parsear_fecha_hora,
    },
    repositories::{FiltroPartidos, PartidoRepository},
    services::{parsear_rango, parsear_rango_requerido, requerido, validar_limite},
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrearPartidoInput {
    pub fecha_hora: Option<String>,
    pub rival: Option<String>,
    pub lugar: Option<String>,
    pub tipo: Option<String>,
    pub es_local: Option<bool>,
    pub observaciones: Option<String>,
}

/// Solo estos campos se pueden modificar; los ausentes no se tocan.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarPartidoInput {
    pub fecha_hora: Option<String>,
    pub rival: Option<String>,
    pub lugar: Option<String>,
    pub tipo: Option<String>,
    pub es_local: Option<bool>,
    pub observaciones: Option<String>,
}

impl ActualizarPartidoInput {
    fn vacio(&self) -> bool {
        self.fecha_hora.is_none()
            && self.rival.is_none()
            && self.lugar.is_none()
            && self.tipo.is_none()
            && self.es_local.is_none()
            && self.observaciones.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListarPartidosInput {
    pub tipo: Option<String>,
    pub fecha_desde: Option<String>,
    pub fecha_hasta: Option<String>,
    pub pagina: Option<i64>,
    pub por_pagina: Option<i64>,
}

pub struct PartidoService {
    partidos: Arc<dyn PartidoRepository>,
    permitir_correccion: bool,
}

impl PartidoService {
    /// `permitir_correccion`: si un resultado ya registrado puede sobrescribirse.
    pub fn new(partidos: Arc<dyn PartidoRepository>, permitir_correccion: bool) -> Self {
        Self { partidos, permitir_correccion }
    }

    async fn cargar(&self, id: i64) -> AppResult<Partido> {
        self.partidos
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::validacion("Partido no encontrado"))
    }

    pub async fn crear(&self, input: CrearPartidoInput, creado_por: i64) -> AppResult<PartidoData> {
        let fecha_hora = parsear_fecha_hora("fechaHora", &requerido("fechaHora", input.fecha_hora)?)?;
        let rival = requerido("rival", input.rival)?;
        let lugar = requerido("lugar", input.lugar)?;
        let tipo = requerido("tipo", input.tipo)?.parse::<TipoPartido>()?;

        let mut partido = Partido::new(fecha_hora, &rival, &lugar, tipo, input.es_local.unwrap_or(true), creado_por)?;
        partido.actualizar_observaciones(input.observaciones);

        let creado = self.partidos.crear(&partido).await?;
        tracing::info!("Partido {} creado por el usuario {}", creado.id(), creado_por);
        Ok(creado.to_object())
    }

    pub async fn obtener(&self, id: i64) -> AppResult<PartidoData> {
        Ok(self.cargar(id).await?.to_object())
    }

    pub async fn actualizar(&self, id: i64, input: ActualizarPartidoInput) -> AppResult<PartidoData> {
        if input.vacio() {
            return Err(AppError::validacion("No se proporcionaron campos para actualizar"));
        }
        // Todo lo que se puede validar sin la base de datos, antes de cargar
        let fecha_hora = input
            .fecha_hora
            .as_deref()
            .map(|f| parsear_fecha_hora("fechaHora", f))
            .transpose()?;
        let tipo = input.tipo.as_deref().map(str::parse::<TipoPartido>).transpose()?;

        let mut partido = self.cargar(id).await?;
        if let Some(fecha_hora) = fecha_hora {
            partido.reprogramar(fecha_hora);
        }
        if let Some(rival) = &input.rival {
            partido.cambiar_rival(rival)?;
        }
        if let Some(lugar) = &input.lugar {
            partido.cambiar_lugar(lugar)?;
        }
        if let Some(tipo) = tipo {
            partido.cambiar_tipo(tipo);
        }
        if let Some(es_local) = input.es_local {
            partido.cambiar_condicion(es_local);
        }
        if input.observaciones.is_some() {
            partido.actualizar_observaciones(input.observaciones);
        }

        let guardado = self.partidos.actualizar(&partido).await?;
        tracing::info!("Partido {} actualizado", id);
        Ok(guardado.to_object())
    }

    pub async fn eliminar(&self, id: i64) -> AppResult<()> {
        if !self.partidos.eliminar(id).await? {
            return Err(AppError::validacion("Partido no encontrado"));
        }
        tracing::info!("Partido {} eliminado", id);
        Ok(())
    }

    pub async fn listar(&self, input: ListarPartidosInput) -> AppResult<Pagina<PartidoData>> {
        let tipo = input.tipo.as_deref().map(str::parse::<TipoPartido>).transpose()?;
        let (desde, hasta) = parsear_rango(input.fecha_desde.as_deref(), input.fecha_hasta.as_deref())?;
        let paginacion = Paginacion::new(input.pagina, input.por_pagina)?;

        let pagina = self
            .partidos
            .listar_paginado(&FiltroPartidos { tipo, desde, hasta }, paginacion)
            .await?;
        Ok(pagina.map(|p| p.to_object()))
    }

    pub async fn proximos(&self, limite: Option<i64>) -> AppResult<Vec<PartidoData>> {
        let limite = validar_limite(limite)?;
        let partidos = self.partidos.proximos(Utc::now(), limite).await?;
        Ok(partidos.iter().map(Partido::to_object).collect())
    }

    pub async fn por_rango(&self, desde: Option<String>, hasta: Option<String>) -> AppResult<Vec<PartidoData>> {
        let (desde, hasta) = parsear_rango_requerido(desde, hasta)?;
        let partidos = self.partidos.por_rango(desde, hasta).await?;
        Ok(partidos.iter().map(Partido::to_object).collect())
    }

    pub async fn registrar_resultado(&self, id: i64, resultado: Option<String>) -> AppResult<PartidoData> {
        let resultado = requerido("resultado", resultado)?;
        let mut partido = self.cargar(id).await?;
        if let Err(e) = partido.registrar_resultado(&resultado, self.permitir_correccion) {
            tracing::warn!("Resultado rechazado para el partido {}: {}", id, e);
            return Err(e);
        }
        let guardado = self.partidos.actualizar(&partido).await?;
        tracing::info!("Partido {}: resultado {}", id, resultado.trim());
        Ok(guardado.to_object())
    }
}
