// src/web/mod.rs
pub mod asistencia_handlers;
pub mod auth_handlers;
pub mod catalogo_handlers;
pub mod entrenamiento_handlers;
pub mod jugador_handlers;
pub mod mw_auth;
pub mod mw_gestor;
pub mod partido_handlers;
pub mod routes;
pub mod usuario_handlers;

use crate::{
    error::{AppError, AppResult},
    services::auth_service::UsuarioSesion,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct LimiteQuery {
    pub limite: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangoQuery {
    pub fecha_desde: Option<String>,
    pub fecha_hasta: Option<String>,
}

/// Deja pasar al gestor o al usuario dueño del recurso.
pub(crate) fn exigir_gestor_o_propietario(sesion: &UsuarioSesion, propietario: Option<i64>) -> AppResult<()> {
    if sesion.es_gestor() || propietario == Some(sesion.usuario_id) {
        Ok(())
    } else {
        Err(AppError::AccesoDenegado)
    }
}
