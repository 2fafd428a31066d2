// src/services/jugador_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        jugador::{Jugador, JugadorData, NuevoJugador},
        paginacion::{Pagina, Paginacion},
        usuario::Rol,
    },
    repositories::{CatalogoRepository, FiltroJugadores, JugadorRepository, UsuarioRepository},
    services::requerido,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListarJugadoresInput {
    pub posicion_id: Option<i64>,
    pub pagina: Option<i64>,
    pub por_pagina: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatosPersonalesInput {
    pub fecha_nacimiento: Option<NaiveDate>,
    pub alias: Option<String>,
    pub foto_url: Option<String>,
}

pub struct JugadorService {
    jugadores: Arc<dyn JugadorRepository>,
    usuarios: Arc<dyn UsuarioRepository>,
    catalogo: Arc<dyn CatalogoRepository>,
}

impl JugadorService {
    pub fn new(
        jugadores: Arc<dyn JugadorRepository>,
        usuarios: Arc<dyn UsuarioRepository>,
        catalogo: Arc<dyn CatalogoRepository>,
    ) -> Self {
        Self { jugadores, usuarios, catalogo }
    }

    async fn cargar(&self, id: i64) -> AppResult<Jugador> {
        self.jugadores
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::validacion("Jugador no encontrado"))
    }

    async fn comprobar_dorsal_libre(&self, dorsal: Option<i64>, excluir_id: Option<i64>) -> AppResult<()> {
        if let Some(d) = dorsal {
            if self.jugadores.existe_dorsal(d, excluir_id).await? {
                tracing::warn!("Dorsal {} ya asignado a otro jugador", d);
                return Err(AppError::validacion(format!("El dorsal {} ya está asignado a otro jugador", d)));
            }
        }
        Ok(())
    }

    async fn comprobar_posicion(&self, posicion_id: Option<i64>) -> AppResult<()> {
        if let Some(id) = posicion_id {
            let posiciones = self.catalogo.listar_posiciones().await?;
            if !posiciones.iter().any(|p| p.id == id) {
                return Err(AppError::validacion("Posición no encontrada"));
            }
        }
        Ok(())
    }

    /// El usuario existe, tiene rol jugador y aún no tiene perfil.
    async fn comprobar_usuario_disponible(&self, usuario_id: i64) -> AppResult<()> {
        let usuario = self
            .usuarios
            .buscar_por_id(usuario_id)
            .await?
            .ok_or_else(|| AppError::validacion("Usuario no encontrado"))?;
        if usuario.rol() != Rol::Jugador {
            return Err(AppError::validacion("El usuario no tiene rol jugador"));
        }
        if self.jugadores.buscar_por_usuario_id(usuario_id).await?.is_some() {
            return Err(AppError::validacion("El usuario ya tiene un perfil de jugador"));
        }
        Ok(())
    }

    pub async fn crear(&self, datos: NuevoJugador) -> AppResult<JugadorData> {
        let jugador = Jugador::new(datos)?;
        let usuario_id = jugador.usuario_id().ok_or(AppError::InternalServerError)?;

        self.comprobar_usuario_disponible(usuario_id).await?;
        self.comprobar_dorsal_libre(jugador.numero_dorsal(), None).await?;
        self.comprobar_posicion(jugador.posicion_id()).await?;

        let creado = self.jugadores.crear(&jugador).await?;
        tracing::info!("Perfil de jugador {} creado para el usuario {}", creado.id(), usuario_id);
        Ok(creado.to_object())
    }

    pub async fn obtener(&self, id: i64) -> AppResult<JugadorData> {
        Ok(self.cargar(id).await?.to_object())
    }

    pub async fn obtener_por_usuario(&self, usuario_id: i64) -> AppResult<JugadorData> {
        self.jugadores
            .buscar_por_usuario_id(usuario_id)
            .await?
            .map(|j| j.to_object())
            .ok_or_else(|| AppError::validacion("El usuario no tiene perfil de jugador"))
    }

    pub async fn listar(&self, input: ListarJugadoresInput) -> AppResult<Pagina<JugadorData>> {
        let paginacion = Paginacion::new(input.pagina, input.por_pagina)?;
        let filtro = FiltroJugadores { posicion_id: input.posicion_id };
        let pagina = self.jugadores.listar_paginado(&filtro, paginacion).await?;
        Ok(pagina.map(|j| j.to_object()))
    }

    pub async fn listar_por_posicion(&self, posicion_id: i64) -> AppResult<Vec<JugadorData>> {
        self.comprobar_posicion(Some(posicion_id)).await?;
        let jugadores = self.jugadores.listar_por_posicion(posicion_id).await?;
        Ok(jugadores.iter().map(Jugador::to_object).collect())
    }

    /// `None` libera el dorsal. Repetir el dorsal propio no es un conflicto.
    pub async fn asignar_dorsal(&self, id: i64, dorsal: Option<i64>) -> AppResult<JugadorData> {
        let mut jugador = self.cargar(id).await?;
        jugador.asignar_dorsal(dorsal)?;
        self.comprobar_dorsal_libre(dorsal, Some(id)).await?;
        let guardado = self.jugadores.actualizar(&jugador).await?;
        tracing::info!("Jugador {}: dorsal {:?}", id, dorsal);
        Ok(guardado.to_object())
    }

    pub async fn cambiar_posicion(&self, id: i64, posicion_id: Option<i64>) -> AppResult<JugadorData> {
        let mut jugador = self.cargar(id).await?;
        jugador.cambiar_posicion(posicion_id)?;
        self.comprobar_posicion(posicion_id).await?;
        Ok(self.jugadores.actualizar(&jugador).await?.to_object())
    }

    pub async fn actualizar_contacto(&self, id: i64, telefono: Option<String>) -> AppResult<JugadorData> {
        let mut jugador = self.cargar(id).await?;
        jugador.actualizar_contacto(telefono)?;
        Ok(self.jugadores.actualizar(&jugador).await?.to_object())
    }

    pub async fn actualizar_datos_personales(&self, id: i64, input: DatosPersonalesInput) -> AppResult<JugadorData> {
        let mut jugador = self.cargar(id).await?;
        jugador.actualizar_datos_personales(input.fecha_nacimiento, input.alias, input.foto_url)?;
        Ok(self.jugadores.actualizar(&jugador).await?.to_object())
    }

    /// Enlaza un perfil sin usuario (filas antiguas) con una cuenta de rol jugador.
    pub async fn vincular_usuario(&self, id: i64, usuario_id: Option<i64>) -> AppResult<JugadorData> {
        let usuario_id = requerido("usuarioId", usuario_id)?;
        let mut jugador = self.cargar(id).await?;
        if jugador.usuario_id().is_some() {
            return Err(AppError::validacion("El jugador ya está vinculado a un usuario"));
        }
        jugador.vincular_usuario(usuario_id)?;
        self.comprobar_usuario_disponible(usuario_id).await?;
        let guardado = self.jugadores.actualizar(&jugador).await?;
        tracing::info!("Jugador {} vinculado al usuario {}", id, usuario_id);
        Ok(guardado.to_object())
    }

    pub async fn eliminar(&self, id: i64) -> AppResult<()> {
        if !self.jugadores.eliminar(id).await? {
            return Err(AppError::validacion("Jugador no encontrado"));
        }
        tracing::info!("Jugador {} eliminado", id);
        Ok(())
    }
}
