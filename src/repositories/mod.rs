// src/repositories/mod.rs
//! Contratos de persistencia. Los servicios solo conocen estos traits;
//! la implementación SQLite vive en `sqlite`.

pub mod sqlite;

#[cfg(test)]
pub mod memoria;

use crate::error::AppResult;
use crate::models::{
    asistencia::{Asistencia, EstadisticasAsistencia, EventoAsistencia, FiltroAsistencias, NuevaAsistencia, TipoEvento},
    catalogo::{MotivoAusencia, Posicion},
    entrenamiento::Entrenamiento,
    jugador::Jugador,
    paginacion::{Pagina, Paginacion},
    partido::{Partido, TipoPartido},
    usuario::{Rol, Usuario},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct FiltroUsuarios {
    pub rol: Option<Rol>,
    pub activo: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct FiltroJugadores {
    pub posicion_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct FiltroPartidos {
    pub tipo: Option<TipoPartido>,
    pub desde: Option<DateTime<Utc>>,
    pub hasta: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct FiltroEntrenamientos {
    pub desde: Option<DateTime<Utc>>,
    pub hasta: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait UsuarioRepository: Send + Sync {
    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<Usuario>>;
    async fn buscar_por_email(&self, email: &str) -> AppResult<Option<Usuario>>;
    async fn listar_paginado(&self, filtro: &FiltroUsuarios, paginacion: Paginacion) -> AppResult<Pagina<Usuario>>;
    async fn crear(&self, usuario: &Usuario) -> AppResult<Usuario>;
    async fn actualizar(&self, usuario: &Usuario) -> AppResult<Usuario>;
}

#[async_trait]
pub trait JugadorRepository: Send + Sync {
    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<Jugador>>;
    async fn buscar_por_usuario_id(&self, usuario_id: i64) -> AppResult<Option<Jugador>>;
    async fn listar_paginado(&self, filtro: &FiltroJugadores, paginacion: Paginacion) -> AppResult<Pagina<Jugador>>;
    async fn listar_por_posicion(&self, posicion_id: i64) -> AppResult<Vec<Jugador>>;
    /// ¿Usa otro jugador (distinto de `excluir_id`) este dorsal?
    async fn existe_dorsal(&self, dorsal: i64, excluir_id: Option<i64>) -> AppResult<bool>;
    async fn crear(&self, jugador: &Jugador) -> AppResult<Jugador>;
    async fn actualizar(&self, jugador: &Jugador) -> AppResult<Jugador>;
    async fn eliminar(&self, id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait PartidoRepository: Send + Sync {
    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<Partido>>;
    async fn listar_paginado(&self, filtro: &FiltroPartidos, paginacion: Paginacion) -> AppResult<Pagina<Partido>>;
    async fn proximos(&self, desde: DateTime<Utc>, limite: i64) -> AppResult<Vec<Partido>>;
    async fn por_rango(&self, desde: DateTime<Utc>, hasta: DateTime<Utc>) -> AppResult<Vec<Partido>>;
    async fn crear(&self, partido: &Partido) -> AppResult<Partido>;
    async fn actualizar(&self, partido: &Partido) -> AppResult<Partido>;
    async fn eliminar(&self, id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait EntrenamientoRepository: Send + Sync {
    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<Entrenamiento>>;
    async fn listar_paginado(
        &self,
        filtro: &FiltroEntrenamientos,
        paginacion: Paginacion,
    ) -> AppResult<Pagina<Entrenamiento>>;
    async fn proximos(&self, desde: DateTime<Utc>, limite: i64) -> AppResult<Vec<Entrenamiento>>;
    async fn por_rango(&self, desde: DateTime<Utc>, hasta: DateTime<Utc>) -> AppResult<Vec<Entrenamiento>>;
    async fn crear(&self, entrenamiento: &Entrenamiento) -> AppResult<Entrenamiento>;
    async fn actualizar(&self, entrenamiento: &Entrenamiento) -> AppResult<Entrenamiento>;
    async fn eliminar(&self, id: i64) -> AppResult<bool>;
}

/// Un único contrato para las asistencias a partidos y a entrenamientos;
/// el tipo de evento viaja en `EventoAsistencia` / `TipoEvento`.
#[async_trait]
pub trait AsistenciaRepository: Send + Sync {
    async fn registrar(&self, nueva: &NuevaAsistencia) -> AppResult<Asistencia>;
    async fn actualizar(&self, asistencia: &Asistencia) -> AppResult<Asistencia>;
    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<Asistencia>>;
    async fn buscar_por_jugador_y_evento(
        &self,
        jugador_id: i64,
        evento: EventoAsistencia,
    ) -> AppResult<Option<Asistencia>>;
    async fn listar_por_evento(&self, evento: EventoAsistencia) -> AppResult<Vec<Asistencia>>;
    /// Filtra por tipo de evento y por la fecha del evento (ambos límites inclusive).
    async fn listar_por_jugador(&self, jugador_id: i64, filtro: &FiltroAsistencias) -> AppResult<Vec<Asistencia>>;
    /// Conteos de un jugador para un solo tipo de evento; `filtro.tipo` se ignora.
    async fn estadisticas_por_jugador(
        &self,
        jugador_id: i64,
        tipo: TipoEvento,
        filtro: &FiltroAsistencias,
    ) -> AppResult<EstadisticasAsistencia>;
    async fn estadisticas_por_evento(&self, evento: EventoAsistencia) -> AppResult<EstadisticasAsistencia>;
    async fn eliminar(&self, id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait CatalogoRepository: Send + Sync {
    async fn listar_posiciones(&self) -> AppResult<Vec<Posicion>>;
    async fn listar_motivos_ausencia(&self) -> AppResult<Vec<MotivoAusencia>>;
}
