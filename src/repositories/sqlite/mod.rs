// src/repositories/sqlite/mod.rs
mod asistencia;
mod catalogo;
mod entrenamiento;
mod jugador;
mod partido;
mod usuario;

pub use asistencia::SqliteAsistenciaRepository;
pub use catalogo::SqliteCatalogoRepository;
pub use entrenamiento::SqliteEntrenamientoRepository;
pub use jugador::SqliteJugadorRepository;
pub use partido::SqlitePartidoRepository;
pub use usuario::SqliteUsuarioRepository;
