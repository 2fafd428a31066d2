// src/state.rs
use crate::{
    config::Config,
    repositories::{
        sqlite::{
            SqliteAsistenciaRepository, SqliteCatalogoRepository, SqliteEntrenamientoRepository,
            SqliteJugadorRepository, SqlitePartidoRepository, SqliteUsuarioRepository,
        },
        AsistenciaRepository, CatalogoRepository, EntrenamientoRepository, JugadorRepository, PartidoRepository,
        UsuarioRepository,
    },
    services::{
        asistencia_service::AsistenciaService, auth_service::PasswordHasher,
        entrenamiento_service::EntrenamientoService, estadisticas_service::EstadisticasService,
        jugador_service::JugadorService, partido_service::PartidoService, usuario_service::UsuarioService,
    },
};
use axum::extract::FromRef;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Implementaciones concretas de cada contrato de persistencia.
#[derive(Clone)]
pub struct Repositorios {
    pub usuarios: Arc<dyn UsuarioRepository>,
    pub jugadores: Arc<dyn JugadorRepository>,
    pub partidos: Arc<dyn PartidoRepository>,
    pub entrenamientos: Arc<dyn EntrenamientoRepository>,
    pub asistencias: Arc<dyn AsistenciaRepository>,
    pub catalogo: Arc<dyn CatalogoRepository>,
}

impl Repositorios {
    pub fn sqlite(pool: SqlitePool) -> Self {
        Self {
            usuarios: Arc::new(SqliteUsuarioRepository::new(pool.clone())),
            jugadores: Arc::new(SqliteJugadorRepository::new(pool.clone())),
            partidos: Arc::new(SqlitePartidoRepository::new(pool.clone())),
            entrenamientos: Arc::new(SqliteEntrenamientoRepository::new(pool.clone())),
            asistencias: Arc::new(SqliteAsistenciaRepository::new(pool.clone())),
            catalogo: Arc::new(SqliteCatalogoRepository::new(pool)),
        }
    }
}

// Todo lo que necesitan los handlers; se construye una vez en main y se clona por petición
#[derive(Clone)]
pub struct AppState {
    pub usuarios: Arc<UsuarioService>,
    pub jugadores: Arc<JugadorService>,
    pub partidos: Arc<PartidoService>,
    pub entrenamientos: Arc<EntrenamientoService>,
    pub asistencias: Arc<AsistenciaService>,
    pub estadisticas: Arc<EstadisticasService>,
    pub catalogo: Arc<dyn CatalogoRepository>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &Config, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self::con_repositorios(Repositorios::sqlite(pool), hasher, config.permitir_correccion_resultado)
    }

    pub fn con_repositorios(
        repos: Repositorios,
        hasher: Arc<dyn PasswordHasher>,
        permitir_correccion_resultado: bool,
    ) -> Self {
        Self {
            usuarios: Arc::new(UsuarioService::new(repos.usuarios.clone(), hasher)),
            jugadores: Arc::new(JugadorService::new(
                repos.jugadores.clone(),
                repos.usuarios.clone(),
                repos.catalogo.clone(),
            )),
            partidos: Arc::new(PartidoService::new(repos.partidos.clone(), permitir_correccion_resultado)),
            entrenamientos: Arc::new(EntrenamientoService::new(repos.entrenamientos.clone())),
            asistencias: Arc::new(AsistenciaService::new(
                repos.asistencias.clone(),
                repos.jugadores.clone(),
                repos.partidos.clone(),
                repos.entrenamientos.clone(),
                repos.catalogo.clone(),
            )),
            estadisticas: Arc::new(EstadisticasService::new(repos.asistencias.clone(), repos.jugadores.clone())),
            catalogo: repos.catalogo,
        }
    }

    /// Estado sobre los repositorios en memoria, para las pruebas del router.
    #[cfg(test)]
    pub fn en_memoria(repos: &crate::repositories::memoria::RepositoriosMemoria) -> Self {
        use crate::services::auth_service::BcryptHasher;
        let repositorios = Repositorios {
            usuarios: Arc::new(repos.usuarios.clone()),
            jugadores: Arc::new(repos.jugadores.clone()),
            partidos: Arc::new(repos.partidos.clone()),
            entrenamientos: Arc::new(repos.entrenamientos.clone()),
            asistencias: Arc::new(repos.asistencias.clone()),
            catalogo: Arc::new(repos.catalogo.clone()),
        };
        Self::con_repositorios(repositorios, Arc::new(BcryptHasher::new(4)), true)
    }
}

impl FromRef<AppState> for Arc<AsistenciaService> {
    fn from_ref(state: &AppState) -> Self {
        state.asistencias.clone()
    }
}

impl FromRef<AppState> for Arc<EstadisticasService> {
    fn from_ref(state: &AppState) -> Self {
        state.estadisticas.clone()
    }
}
