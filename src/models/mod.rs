// src/models/mod.rs
pub mod asistencia;
pub mod catalogo;
pub mod entrenamiento;
pub mod jugador;
pub mod paginacion;
pub mod partido;
pub mod usuario;
pub mod validacion;
