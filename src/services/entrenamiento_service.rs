// src/services/entrenamiento_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        entrenamiento::{Entrenamiento, EntrenamientoData},
        paginacion::{Pagina, Paginacion},
        validacion::parsear_fecha_hora,
    },
    repositories::{EntrenamientoRepository, FiltroEntrenamientos},
    services::{parsear_rango, parsear_rango_requerido, requerido, validar_limite},
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrearEntrenamientoInput {
    pub fecha_hora: Option<String>,
    pub lugar: Option<String>,
    pub descripcion: Option<String>,
    pub duracion_minutos: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarEntrenamientoInput {
    pub fecha_hora: Option<String>,
    pub lugar: Option<String>,
    pub descripcion: Option<String>,
    pub duracion_minutos: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListarEntrenamientosInput {
    pub fecha_desde: Option<String>,
    pub fecha_hasta: Option<String>,
    pub pagina: Option<i64>,
    pub por_pagina: Option<i64>,
}

pub struct EntrenamientoService {
    entrenamientos: Arc<dyn EntrenamientoRepository>,
}

impl EntrenamientoService {
    pub fn new(entrenamientos: Arc<dyn EntrenamientoRepository>) -> Self {
        Self { entrenamientos }
    }

    async fn cargar(&self, id: i64) -> AppResult<Entrenamiento> {
        self.entrenamientos
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::validacion("Entrenamiento no encontrado"))
    }

    pub async fn crear(&self, input: CrearEntrenamientoInput, creado_por: i64) -> AppResult<EntrenamientoData> {
        let fecha_hora = parsear_fecha_hora("fechaHora", &requerido("fechaHora", input.fecha_hora)?)?;
        let lugar = requerido("lugar", input.lugar)?;
        let entrenamiento =
            Entrenamiento::new(fecha_hora, &lugar, input.descripcion, input.duracion_minutos, creado_por)?;

        let creado = self.entrenamientos.crear(&entrenamiento).await?;
        tracing::info!("Entrenamiento {} creado por el usuario {}", creado.id(), creado_por);
        Ok(creado.to_object())
    }

    pub async fn obtener(&self, id: i64) -> AppResult<EntrenamientoData> {
        Ok(self.cargar(id).await?.to_object())
    }

    pub async fn actualizar(&self, id: i64, input: ActualizarEntrenamientoInput) -> AppResult<EntrenamientoData> {
        if input.fecha_hora.is_none()
            && input.lugar.is_none()
            && input.descripcion.is_none()
            && input.duracion_minutos.is_none()
        {
            return Err(AppError::validacion("No se proporcionaron campos para actualizar"));
        }
        let fecha_hora = input
            .fecha_hora
            .as_deref()
            .map(|f| parsear_fecha_hora("fechaHora", f))
            .transpose()?;

        let mut entrenamiento = self.cargar(id).await?;
        if let Some(fecha_hora) = fecha_hora {
            entrenamiento.reprogramar(fecha_hora);
        }
        if let Some(lugar) = &input.lugar {
            entrenamiento.cambiar_lugar(lugar)?;
        }
        if input.descripcion.is_some() {
            entrenamiento.cambiar_descripcion(input.descripcion);
        }
        if let Some(minutos) = input.duracion_minutos {
            entrenamiento.cambiar_duracion(minutos)?;
        }

        let guardado = self.entrenamientos.actualizar(&entrenamiento).await?;
        tracing::info!("Entrenamiento {} actualizado", id);
        Ok(guardado.to_object())
    }

    pub async fn eliminar(&self, id: i64) -> AppResult<()> {
        if !self.entrenamientos.eliminar(id).await? {
            return Err(AppError::validacion("Entrenamiento no encontrado"));
        }
        tracing::info!("Entrenamiento {} eliminado", id);
        Ok(())
    }

    pub async fn listar(&self, input: ListarEntrenamientosInput) -> AppResult<Pagina<EntrenamientoData>> {
        let (desde, hasta) = parsear_rango(input.fecha_desde.as_deref(), input.fecha_hasta.as_deref())?;
        let paginacion = Paginacion::new(input.pagina, input.por_pagina)?;
        let pagina = self
            .entrenamientos
            .listar_paginado(&FiltroEntrenamientos { desde, hasta }, paginacion)
            .await?;
        Ok(pagina.map(|e| e.to_object()))
    }

    pub async fn proximos(&self, limite: Option<i64>) -> AppResult<Vec<EntrenamientoData>> {
        let limite = validar_limite(limite)?;
        let entrenamientos = self.entrenamientos.proximos(Utc::now(), limite).await?;
        Ok(entrenamientos.iter().map(Entrenamiento::to_object).collect())
    }

    pub async fn por_rango(&self, desde: Option<String>, hasta: Option<String>) -> AppResult<Vec<EntrenamientoData>> {
        let (desde, hasta) = parsear_rango_requerido(desde, hasta)?;
        let entrenamientos = self.entrenamientos.por_rango(desde, hasta).await?;
        Ok(entrenamientos.iter().map(Entrenamiento::to_object).collect())
    }
}
