// src/repositories/memoria.rs
//! Repositorios en memoria para las pruebas de los servicios.

use crate::{
    error::{AppError, AppResult},
    models::{
        asistencia::{
            Asistencia, EstadisticasAsistencia, EventoAsistencia, FiltroAsistencias, NuevaAsistencia, TipoEvento,
        },
        catalogo::{MotivoAusencia, Posicion},
        entrenamiento::Entrenamiento,
        jugador::Jugador,
        paginacion::{Pagina, Paginacion},
        partido::Partido,
        usuario::Usuario,
    },
    repositories::{
        AsistenciaRepository, CatalogoRepository, EntrenamientoRepository, FiltroEntrenamientos, FiltroJugadores,
        FiltroPartidos, FiltroUsuarios, JugadorRepository, PartidoRepository, UsuarioRepository,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::Mutex;

/// Filas por id, con autoincremento como en SQLite.
#[derive(Debug)]
struct Tabla<T> {
    siguiente_id: i64,
    filas: BTreeMap<i64, T>,
}

impl<T> Default for Tabla<T> {
    fn default() -> Self {
        Self { siguiente_id: 1, filas: BTreeMap::new() }
    }
}

impl<T> Tabla<T> {
    fn reservar_id(&mut self) -> i64 {
        let id = self.siguiente_id;
        self.siguiente_id += 1;
        id
    }
}

fn violacion_unica(restriccion: &str) -> AppError {
    AppError::SqlxError(sqlx::Error::Protocol(format!("UNIQUE constraint failed: {}", restriccion)))
}

fn paginar<T: Clone>(todos: Vec<T>, paginacion: Paginacion) -> Pagina<T> {
    let total = todos.len() as i64;
    let items = todos
        .into_iter()
        .skip(paginacion.offset() as usize)
        .take(paginacion.limit() as usize)
        .collect();
    Pagina::new(items, total, paginacion)
}

fn en_rango(fecha: DateTime<Utc>, desde: Option<DateTime<Utc>>, hasta: Option<DateTime<Utc>>) -> bool {
    desde.map_or(true, |d| fecha >= d) && hasta.map_or(true, |h| fecha <= h)
}

// --- Usuarios ---

#[derive(Clone, Default)]
pub struct MemoriaUsuarios {
    tabla: Arc<Mutex<Tabla<Usuario>>>,
}

impl MemoriaUsuarios {
    async fn filtrar(&self, filtro: &FiltroUsuarios) -> AppResult<Vec<Usuario>> {
        let tabla = self.tabla.lock().await;
        let mut usuarios: Vec<Usuario> = tabla
            .filas
            .values()
            .filter(|u| filtro.rol.map_or(true, |r| u.rol() == r))
            .filter(|u| filtro.activo.map_or(true, |a| u.activo() == a))
            .cloned()
            .collect();
        usuarios.sort_by(|a, b| a.nombre().cmp(b.nombre()).then(a.id().cmp(&b.id())));
        Ok(usuarios)
    }
}

#[async_trait]
impl UsuarioRepository for MemoriaUsuarios {
    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<Usuario>> {
        Ok(self.tabla.lock().await.filas.get(&id).cloned())
    }

    async fn buscar_por_email(&self, email: &str) -> AppResult<Option<Usuario>> {
        let email = email.trim().to_lowercase();
        let tabla = self.tabla.lock().await;
        Ok(tabla.filas.values().find(|u| u.email() == email).cloned())
    }

    async fn listar_paginado(&self, filtro: &FiltroUsuarios, paginacion: Paginacion) -> AppResult<Pagina<Usuario>> {
        Ok(paginar(self.filtrar(filtro).await?, paginacion))
    }

    async fn crear(&self, usuario: &Usuario) -> AppResult<Usuario> {
        let mut tabla = self.tabla.lock().await;
        if tabla.filas.values().any(|u| u.email() == usuario.email()) {
            return Err(violacion_unica("usuarios.email"));
        }
        let mut data = usuario.to_object();
        data.id = tabla.reservar_id();
        let creado = Usuario::rehidratar(data)?;
        tabla.filas.insert(creado.id(), creado.clone());
        Ok(creado)
    }

    async fn actualizar(&self, usuario: &Usuario) -> AppResult<Usuario> {
        let mut tabla = self.tabla.lock().await;
        if !tabla.filas.contains_key(&usuario.id()) {
            return Err(AppError::validacion(format!("Usuario {} no encontrado", usuario.id())));
        }
        tabla.filas.insert(usuario.id(), usuario.clone());
        Ok(usuario.clone())
    }
}

// --- Jugadores ---

#[derive(Clone, Default)]
pub struct MemoriaJugadores {
    tabla: Arc<Mutex<Tabla<Jugador>>>,
}

impl MemoriaJugadores {
    /// Inserta una fila tal cual, sin pasar por las validaciones de `Jugador::new`.
    pub async fn insertar_fila(&self, jugador: Jugador) -> Jugador {
        let mut tabla = self.tabla.lock().await;
        let mut data = jugador.to_object();
        data.id = tabla.reservar_id();
        let fila = Jugador::rehidratar(data);
        tabla.filas.insert(fila.id(), fila.clone());
        fila
    }

    async fn filtrar(&self, filtro: &FiltroJugadores) -> AppResult<Vec<Jugador>> {
        let tabla = self.tabla.lock().await;
        let mut jugadores: Vec<Jugador> = tabla
            .filas
            .values()
            .filter(|j| filtro.posicion_id.map_or(true, |p| j.posicion_id() == Some(p)))
            .cloned()
            .collect();
        jugadores.sort_by(orden_dorsal);
        Ok(jugadores)
    }
}

fn orden_dorsal(a: &Jugador, b: &Jugador) -> std::cmp::Ordering {
    let clave = |j: &Jugador| (j.numero_dorsal().is_none(), j.numero_dorsal(), j.id());
    clave(a).cmp(&clave(b))
}

#[async_trait]
impl JugadorRepository for MemoriaJugadores {
    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<Jugador>> {
        Ok(self.tabla.lock().await.filas.get(&id).cloned())
    }

    async fn buscar_por_usuario_id(&self, usuario_id: i64) -> AppResult<Option<Jugador>> {
        let tabla = self.tabla.lock().await;
        Ok(tabla.filas.values().find(|j| j.usuario_id() == Some(usuario_id)).cloned())
    }

    async fn listar_paginado(&self, filtro: &FiltroJugadores, paginacion: Paginacion) -> AppResult<Pagina<Jugador>> {
        Ok(paginar(self.filtrar(filtro).await?, paginacion))
    }

    async fn listar_por_posicion(&self, posicion_id: i64) -> AppResult<Vec<Jugador>> {
        self.filtrar(&FiltroJugadores { posicion_id: Some(posicion_id) }).await
    }

    async fn existe_dorsal(&self, dorsal: i64, excluir_id: Option<i64>) -> AppResult<bool> {
        let tabla = self.tabla.lock().await;
        Ok(tabla
            .filas
            .values()
            .any(|j| j.numero_dorsal() == Some(dorsal) && Some(j.id()) != excluir_id))
    }

    async fn crear(&self, jugador: &Jugador) -> AppResult<Jugador> {
        {
            let tabla = self.tabla.lock().await;
            if jugador.usuario_id().is_some() && tabla.filas.values().any(|j| j.usuario_id() == jugador.usuario_id()) {
                return Err(violacion_unica("jugadores.usuario_id"));
            }
        }
        Ok(self.insertar_fila(jugador.clone()).await)
    }

    async fn actualizar(&self, jugador: &Jugador) -> AppResult<Jugador> {
        let mut tabla = self.tabla.lock().await;
        if !tabla.filas.contains_key(&jugador.id()) {
            return Err(AppError::validacion(format!("Jugador {} no encontrado", jugador.id())));
        }
        tabla.filas.insert(jugador.id(), jugador.clone());
        Ok(jugador.clone())
    }

    async fn eliminar(&self, id: i64) -> AppResult<bool> {
        Ok(self.tabla.lock().await.filas.remove(&id).is_some())
    }
}

// --- Partidos ---

#[derive(Clone, Default)]
pub struct MemoriaPartidos {
    tabla: Arc<Mutex<Tabla<Partido>>>,
}

impl MemoriaPartidos {
    async fn fecha_de(&self, id: i64) -> Option<DateTime<Utc>> {
        self.tabla.lock().await.filas.get(&id).map(Partido::fecha_hora)
    }

    async fn filtrar(&self, filtro: &FiltroPartidos) -> AppResult<Vec<Partido>> {
        let tabla = self.tabla.lock().await;
        let mut partidos: Vec<Partido> = tabla
            .filas
            .values()
            .filter(|p| filtro.tipo.map_or(true, |t| p.tipo() == t))
            .filter(|p| en_rango(p.fecha_hora(), filtro.desde, filtro.hasta))
            .cloned()
            .collect();
        partidos.sort_by_key(|p| (p.fecha_hora(), p.id()));
        Ok(partidos)
    }
}

#[async_trait]
impl PartidoRepository for MemoriaPartidos {
    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<Partido>> {
        Ok(self.tabla.lock().await.filas.get(&id).cloned())
    }

    async fn listar_paginado(&self, filtro: &FiltroPartidos, paginacion: Paginacion) -> AppResult<Pagina<Partido>> {
        let mut partidos = self.filtrar(filtro).await?;
        partidos.reverse();
        Ok(paginar(partidos, paginacion))
    }

    async fn proximos(&self, desde: DateTime<Utc>, limite: i64) -> AppResult<Vec<Partido>> {
        let mut partidos = self.filtrar(&FiltroPartidos { desde: Some(desde), ..Default::default() }).await?;
        partidos.truncate(limite.max(0) as usize);
        Ok(partidos)
    }

    async fn por_rango(&self, desde: DateTime<Utc>, hasta: DateTime<Utc>) -> AppResult<Vec<Partido>> {
        self.filtrar(&FiltroPartidos { tipo: None, desde: Some(desde), hasta: Some(hasta) }).await
    }

    async fn crear(&self, partido: &Partido) -> AppResult<Partido> {
        let mut tabla = self.tabla.lock().await;
        let mut data = partido.to_object();
        data.id = tabla.reservar_id();
        let creado = Partido::rehidratar(data)?;
        tabla.filas.insert(creado.id(), creado.clone());
        Ok(creado)
    }

    async fn actualizar(&self, partido: &Partido) -> AppResult<Partido> {
        let mut tabla = self.tabla.lock().await;
        if !tabla.filas.contains_key(&partido.id()) {
            return Err(AppError::validacion(format!("Partido {} no encontrado", partido.id())));
        }
        tabla.filas.insert(partido.id(), partido.clone());
        Ok(partido.clone())
    }

    async fn eliminar(&self, id: i64) -> AppResult<bool> {
        Ok(self.tabla.lock().await.filas.remove(&id).is_some())
    }
}

// --- Entrenamientos ---

#[derive(Clone, Default)]
pub struct MemoriaEntrenamientos {
    tabla: Arc<Mutex<Tabla<Entrenamiento>>>,
}

impl MemoriaEntrenamientos {
    async fn fecha_de(&self, id: i64) -> Option<DateTime<Utc>> {
        self.tabla.lock().await.filas.get(&id).map(Entrenamiento::fecha_hora)
    }

    async fn filtrar(&self, filtro: &FiltroEntrenamientos) -> AppResult<Vec<Entrenamiento>> {
        let tabla = self.tabla.lock().await;
        let mut entrenamientos: Vec<Entrenamiento> = tabla
            .filas
            .values()
            .filter(|e| en_rango(e.fecha_hora(), filtro.desde, filtro.hasta))
            .cloned()
            .collect();
        entrenamientos.sort_by_key(|e| (e.fecha_hora(), e.id()));
        Ok(entrenamientos)
    }
}

#[async_trait]
impl EntrenamientoRepository for MemoriaEntrenamientos {
    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<Entrenamiento>> {
        Ok(self.tabla.lock().await.filas.get(&id).cloned())
    }

    async fn listar_paginado(
        &self,
        filtro: &FiltroEntrenamientos,
        paginacion: Paginacion,
    ) -> AppResult<Pagina<Entrenamiento>> {
        let mut entrenamientos = self.filtrar(filtro).await?;
        entrenamientos.reverse();
        Ok(paginar(entrenamientos, paginacion))
    }

    async fn proximos(&self, desde: DateTime<Utc>, limite: i64) -> AppResult<Vec<Entrenamiento>> {
        let mut entrenamientos = self.filtrar(&FiltroEntrenamientos { desde: Some(desde), hasta: None }).await?;
        entrenamientos.truncate(limite.max(0) as usize);
        Ok(entrenamientos)
    }

    async fn por_rango(&self, desde: DateTime<Utc>, hasta: DateTime<Utc>) -> AppResult<Vec<Entrenamiento>> {
        self.filtrar(&FiltroEntrenamientos { desde: Some(desde), hasta: Some(hasta) }).await
    }

    async fn crear(&self, entrenamiento: &Entrenamiento) -> AppResult<Entrenamiento> {
        let mut tabla = self.tabla.lock().await;
        let mut data = entrenamiento.to_object();
        data.id = tabla.reservar_id();
        let creado = Entrenamiento::rehidratar(data)?;
        tabla.filas.insert(creado.id(), creado.clone());
        Ok(creado)
    }

    async fn actualizar(&self, entrenamiento: &Entrenamiento) -> AppResult<Entrenamiento> {
        let mut tabla = self.tabla.lock().await;
        if !tabla.filas.contains_key(&entrenamiento.id()) {
            return Err(AppError::validacion(format!("Entrenamiento {} no encontrado", entrenamiento.id())));
        }
        tabla.filas.insert(entrenamiento.id(), entrenamiento.clone());
        Ok(entrenamiento.clone())
    }

    async fn eliminar(&self, id: i64) -> AppResult<bool> {
        Ok(self.tabla.lock().await.filas.remove(&id).is_some())
    }
}

// --- Asistencias ---

/// Necesita los eventos para filtrar por su fecha, como hace el JOIN en SQLite.
#[derive(Clone)]
pub struct MemoriaAsistencias {
    tabla: Arc<Mutex<Tabla<Asistencia>>>,
    partidos: MemoriaPartidos,
    entrenamientos: MemoriaEntrenamientos,
}

impl MemoriaAsistencias {
    pub fn new(partidos: MemoriaPartidos, entrenamientos: MemoriaEntrenamientos) -> Self {
        Self { tabla: Arc::default(), partidos, entrenamientos }
    }

    async fn fecha_evento(&self, evento: EventoAsistencia) -> Option<DateTime<Utc>> {
        match evento {
            EventoAsistencia::Partido(id) => self.partidos.fecha_de(id).await,
            EventoAsistencia::Entrenamiento(id) => self.entrenamientos.fecha_de(id).await,
        }
    }

    /// Asistencias del jugador con la fecha de su evento, filtradas y de la más reciente a la más antigua.
    async fn del_jugador(&self, jugador_id: i64, filtro: &FiltroAsistencias) -> Vec<Asistencia> {
        let candidatas: Vec<Asistencia> = {
            let tabla = self.tabla.lock().await;
            tabla
                .filas
                .values()
                .filter(|a| a.jugador_id == jugador_id)
                .filter(|a| filtro.tipo.map_or(true, |t| a.evento.tipo() == t))
                .cloned()
                .collect()
        };

        let mut con_fecha = Vec::new();
        for asistencia in candidatas {
            let Some(fecha) = self.fecha_evento(asistencia.evento).await else {
                continue;
            };
            if en_rango(fecha, filtro.fecha_desde, filtro.fecha_hasta) {
                con_fecha.push((fecha, asistencia));
            }
        }
        con_fecha.sort_by(|(fa, a), (fb, b)| fb.cmp(fa).then(b.id.cmp(&a.id)));
        con_fecha.into_iter().map(|(_, a)| a).collect()
    }
}

#[async_trait]
impl AsistenciaRepository for MemoriaAsistencias {
    async fn registrar(&self, nueva: &NuevaAsistencia) -> AppResult<Asistencia> {
        let mut tabla = self.tabla.lock().await;
        if tabla
            .filas
            .values()
            .any(|a| a.jugador_id == nueva.jugador_id && a.evento == nueva.evento)
        {
            return Err(violacion_unica("asistencias.jugador_id, evento"));
        }
        let asistencia = Asistencia {
            id: tabla.reservar_id(),
            jugador_id: nueva.jugador_id,
            evento: nueva.evento,
            estado: nueva.estado,
            motivo_ausencia_id: nueva.motivo_ausencia_id,
            comentario: nueva.comentario.clone(),
            fecha_respuesta: Utc::now(),
        };
        tabla.filas.insert(asistencia.id, asistencia.clone());
        Ok(asistencia)
    }

    async fn actualizar(&self, asistencia: &Asistencia) -> AppResult<Asistencia> {
        let mut tabla = self.tabla.lock().await;
        if !tabla.filas.contains_key(&asistencia.id) {
            return Err(AppError::validacion(format!("Asistencia {} no encontrada", asistencia.id)));
        }
        tabla.filas.insert(asistencia.id, asistencia.clone());
        Ok(asistencia.clone())
    }

    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<Asistencia>> {
        Ok(self.tabla.lock().await.filas.get(&id).cloned())
    }

    async fn buscar_por_jugador_y_evento(
        &self,
        jugador_id: i64,
        evento: EventoAsistencia,
    ) -> AppResult<Option<Asistencia>> {
        let tabla = self.tabla.lock().await;
        Ok(tabla
            .filas
            .values()
            .find(|a| a.jugador_id == jugador_id && a.evento == evento)
            .cloned())
    }

    async fn listar_por_evento(&self, evento: EventoAsistencia) -> AppResult<Vec<Asistencia>> {
        let tabla = self.tabla.lock().await;
        Ok(tabla.filas.values().filter(|a| a.evento == evento).cloned().collect())
    }

    async fn listar_por_jugador(&self, jugador_id: i64, filtro: &FiltroAsistencias) -> AppResult<Vec<Asistencia>> {
        Ok(self.del_jugador(jugador_id, filtro).await)
    }

    async fn estadisticas_por_jugador(
        &self,
        jugador_id: i64,
        tipo: TipoEvento,
        filtro: &FiltroAsistencias,
    ) -> AppResult<EstadisticasAsistencia> {
        let filtro = FiltroAsistencias { tipo: Some(tipo), ..filtro.clone() };
        let asistencias = self.del_jugador(jugador_id, &filtro).await;
        Ok(EstadisticasAsistencia::desde_asistencias(&asistencias))
    }

    async fn estadisticas_por_evento(&self, evento: EventoAsistencia) -> AppResult<EstadisticasAsistencia> {
        let asistencias = self.listar_por_evento(evento).await?;
        Ok(EstadisticasAsistencia::desde_asistencias(&asistencias))
    }

    async fn eliminar(&self, id: i64) -> AppResult<bool> {
        Ok(self.tabla.lock().await.filas.remove(&id).is_some())
    }
}

// --- Catálogos ---

#[derive(Clone, Default)]
pub struct MemoriaCatalogo;

#[async_trait]
impl CatalogoRepository for MemoriaCatalogo {
    async fn listar_posiciones(&self) -> AppResult<Vec<Posicion>> {
        Ok(["Portero", "Defensa", "Centrocampista", "Delantero"]
            .iter()
            .zip(1..)
            .map(|(nombre, id)| Posicion { id, nombre: nombre.to_string() })
            .collect())
    }

    async fn listar_motivos_ausencia(&self) -> AppResult<Vec<MotivoAusencia>> {
        Ok(["Lesión", "Enfermedad", "Trabajo", "Estudios", "Motivos personales", "Viaje"]
            .iter()
            .zip(1..)
            .map(|(descripcion, id)| MotivoAusencia { id, descripcion: descripcion.to_string() })
            .collect())
    }
}

/// Todos los repositorios en memoria, compartiendo los mismos datos.
#[derive(Clone)]
pub struct RepositoriosMemoria {
    pub usuarios: MemoriaUsuarios,
    pub jugadores: MemoriaJugadores,
    pub partidos: MemoriaPartidos,
    pub entrenamientos: MemoriaEntrenamientos,
    pub asistencias: MemoriaAsistencias,
    pub catalogo: MemoriaCatalogo,
}

impl Default for RepositoriosMemoria {
    fn default() -> Self {
        let partidos = MemoriaPartidos::default();
        let entrenamientos = MemoriaEntrenamientos::default();
        Self {
            usuarios: MemoriaUsuarios::default(),
            jugadores: MemoriaJugadores::default(),
            asistencias: MemoriaAsistencias::new(partidos.clone(), entrenamientos.clone()),
            partidos,
            entrenamientos,
            catalogo: MemoriaCatalogo,
        }
    }
}

impl RepositoriosMemoria {
    /// Usuario con rol jugador y su perfil. Devuelve `(usuario_id, jugador_id)`.
    pub async fn sembrar_jugador(&self, email: &str) -> (i64, i64) {
        use crate::models::{jugador::NuevoJugador, usuario::Rol};
        let usuario = self
            .usuarios
            .crear(&Usuario::new(email, "hash".into(), "Jugador Prueba", Rol::Jugador).unwrap())
            .await
            .unwrap();
        let jugador = self
            .jugadores
            .crear(&Jugador::new(NuevoJugador { usuario_id: Some(usuario.id()), ..Default::default() }).unwrap())
            .await
            .unwrap();
        (usuario.id(), jugador.id())
    }

    pub async fn sembrar_partido(&self, fecha_hora: DateTime<Utc>) -> i64 {
        use crate::models::partido::TipoPartido;
        let partido = Partido::new(fecha_hora, "Rival FC", "Campo Municipal", TipoPartido::Liga, true, 1).unwrap();
        self.partidos.crear(&partido).await.unwrap().id()
    }

    pub async fn sembrar_entrenamiento(&self, fecha_hora: DateTime<Utc>) -> i64 {
        let entrenamiento = Entrenamiento::new(fecha_hora, "Pista 1", None, None, 1).unwrap();
        self.entrenamientos.crear(&entrenamiento).await.unwrap().id()
    }
}
