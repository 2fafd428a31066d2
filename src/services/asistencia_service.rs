// src/services/asistencia_service.rs
//! Casos de uso de asistencia: registrar, actualizar estado, consultar por evento y borrar.

use crate::{
    error::{AppError, AppResult},
    models::{
        asistencia::{
            Asistencia, AsistenciaData, AsistenciasAgrupadas, EstadisticasAsistencia, EstadoAsistencia,
            EventoAsistencia, IdentificadorJugador, NuevaAsistencia, TipoEvento,
        },
        jugador::Jugador,
    },
    repositories::{
        AsistenciaRepository, CatalogoRepository, EntrenamientoRepository, JugadorRepository, PartidoRepository,
    },
    services::requerido,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

pub const MOTIVO_REQUERIDO: &str = "motivoAusenciaId es requerido cuando el estado es 'ausente'";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarAsistenciaInput {
    pub jugador: Option<IdentificadorJugador>,
    pub partido_id: Option<i64>,
    pub entrenamiento_id: Option<i64>,
    pub estado: Option<String>,
    pub motivo_ausencia_id: Option<i64>,
    pub comentario: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarAsistenciaInput {
    pub estado: Option<String>,
    pub motivo_ausencia_id: Option<i64>,
    pub comentario: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultaEventoInput {
    pub partido_id: Option<i64>,
    pub entrenamiento_id: Option<i64>,
}

impl ConsultaEventoInput {
    fn evento(&self) -> AppResult<EventoAsistencia> {
        EventoAsistencia::desde_ids(self.partido_id, self.entrenamiento_id)
    }
}

fn limpiar_comentario(comentario: Option<String>) -> Option<String> {
    comentario.map(|c| c.trim().to_string()).filter(|c| !c.is_empty())
}

pub struct AsistenciaService {
    asistencias: Arc<dyn AsistenciaRepository>,
    jugadores: Arc<dyn JugadorRepository>,
    partidos: Arc<dyn PartidoRepository>,
    entrenamientos: Arc<dyn EntrenamientoRepository>,
    catalogo: Arc<dyn CatalogoRepository>,
}

impl AsistenciaService {
    pub fn new(
        asistencias: Arc<dyn AsistenciaRepository>,
        jugadores: Arc<dyn JugadorRepository>,
        partidos: Arc<dyn PartidoRepository>,
        entrenamientos: Arc<dyn EntrenamientoRepository>,
        catalogo: Arc<dyn CatalogoRepository>,
    ) -> Self {
        Self { asistencias, jugadores, partidos, entrenamientos, catalogo }
    }

    /// Resuelve el jugador según el discriminante, sin probar un id y luego el otro.
    pub async fn resolver_jugador(&self, identificador: IdentificadorJugador) -> AppResult<Option<Jugador>> {
        match identificador {
            IdentificadorJugador::Usuario(usuario_id) => self.jugadores.buscar_por_usuario_id(usuario_id).await,
            IdentificadorJugador::Jugador(jugador_id) => self.jugadores.buscar_por_id(jugador_id).await,
        }
    }

    /// ¿Es la asistencia de un jugador vinculado a este usuario?
    pub async fn es_de_usuario(&self, asistencia_id: i64, usuario_id: i64) -> AppResult<bool> {
        let Some(asistencia) = self.asistencias.buscar_por_id(asistencia_id).await? else {
            return Ok(false);
        };
        let jugador = self.jugadores.buscar_por_id(asistencia.jugador_id).await?;
        Ok(jugador.and_then(|j| j.usuario_id()) == Some(usuario_id))
    }

    async fn comprobar_evento(&self, evento: EventoAsistencia) -> AppResult<()> {
        let existe = match evento {
            EventoAsistencia::Partido(id) => self.partidos.buscar_por_id(id).await?.is_some(),
            EventoAsistencia::Entrenamiento(id) => self.entrenamientos.buscar_por_id(id).await?.is_some(),
        };
        if !existe {
            let nombre = match evento.tipo() {
                TipoEvento::Partido => "Partido",
                TipoEvento::Entrenamiento => "Entrenamiento",
            };
            return Err(AppError::validacion(format!("{} no encontrado", nombre)));
        }
        Ok(())
    }

    async fn comprobar_motivo(&self, motivo_ausencia_id: Option<i64>) -> AppResult<()> {
        if let Some(id) = motivo_ausencia_id {
            let motivos = self.catalogo.listar_motivos_ausencia().await?;
            if !motivos.iter().any(|m| m.id == id) {
                return Err(AppError::validacion("Motivo de ausencia no encontrado"));
            }
        }
        Ok(())
    }

    async fn cargar(&self, id: i64) -> AppResult<Asistencia> {
        self.asistencias
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::validacion("Asistencia no encontrada"))
    }

    pub async fn registrar(&self, input: RegistrarAsistenciaInput) -> AppResult<AsistenciaData> {
        let identificador = requerido("jugador", input.jugador)?;
        let evento = EventoAsistencia::desde_ids(input.partido_id, input.entrenamiento_id)?;
        let estado = requerido("estado", input.estado)?.parse::<EstadoAsistencia>()?;

        let jugador = self
            .resolver_jugador(identificador)
            .await?
            .ok_or_else(|| AppError::validacion("Jugador no encontrado"))?;

        if estado == EstadoAsistencia::Ausente && input.motivo_ausencia_id.is_none() {
            return Err(AppError::validacion(MOTIVO_REQUERIDO));
        }

        if self
            .asistencias
            .buscar_por_jugador_y_evento(jugador.id(), evento)
            .await?
            .is_some()
        {
            tracing::warn!(
                "Asistencia duplicada: jugador {} ya registrado en {} {}",
                jugador.id(),
                evento.tipo().as_str(),
                evento.id()
            );
            return Err(AppError::validacion(
                "Ya existe un registro de asistencia para este jugador en este evento",
            ));
        }

        self.comprobar_evento(evento).await?;
        self.comprobar_motivo(input.motivo_ausencia_id).await?;

        let nueva = NuevaAsistencia {
            jugador_id: jugador.id(),
            evento,
            estado,
            motivo_ausencia_id: input.motivo_ausencia_id,
            comentario: limpiar_comentario(input.comentario),
        };
        Ok(self.asistencias.registrar(&nueva).await?.to_object())
    }

    /// Actualización parcial: lo que no viene en la entrada no se toca.
    pub async fn actualizar_estado(
        &self,
        id: Option<i64>,
        input: ActualizarAsistenciaInput,
    ) -> AppResult<AsistenciaData> {
        let id = requerido("id", id)?;
        if input.estado.is_none() && input.motivo_ausencia_id.is_none() && input.comentario.is_none() {
            return Err(AppError::validacion("No se proporcionaron campos para actualizar"));
        }
        let mut asistencia = self.cargar(id).await?;

        let nuevo_estado = input.estado.as_deref().map(str::parse::<EstadoAsistencia>).transpose()?;
        if nuevo_estado == Some(EstadoAsistencia::Ausente)
            && input.motivo_ausencia_id.is_none()
            && asistencia.motivo_ausencia_id.is_none()
        {
            return Err(AppError::validacion(MOTIVO_REQUERIDO));
        }
        self.comprobar_motivo(input.motivo_ausencia_id).await?;

        // Un motivo no sobrevive a la salida de "ausente" salvo que se envíe explícitamente
        if let Some(estado) = nuevo_estado {
            if asistencia.estado == EstadoAsistencia::Ausente
                && estado != EstadoAsistencia::Ausente
                && input.motivo_ausencia_id.is_none()
            {
                asistencia.motivo_ausencia_id = None;
            }
            asistencia.estado = estado;
        }
        if input.motivo_ausencia_id.is_some() {
            asistencia.motivo_ausencia_id = input.motivo_ausencia_id;
        }
        if input.comentario.is_some() {
            asistencia.comentario = limpiar_comentario(input.comentario);
        }
        asistencia.fecha_respuesta = Utc::now();

        let guardada = self.asistencias.actualizar(&asistencia).await?;
        tracing::info!("Asistencia {} actualizada a {}", id, guardada.estado);
        Ok(guardada.to_object())
    }

    pub async fn obtener_por_evento(&self, consulta: ConsultaEventoInput) -> AppResult<Vec<AsistenciaData>> {
        let asistencias = self.asistencias.listar_por_evento(consulta.evento()?).await?;
        Ok(asistencias.iter().map(Asistencia::to_object).collect())
    }

    pub async fn obtener_agrupadas(&self, consulta: ConsultaEventoInput) -> AppResult<AsistenciasAgrupadas> {
        let asistencias = self.asistencias.listar_por_evento(consulta.evento()?).await?;
        Ok(AsistenciasAgrupadas::agrupar(&asistencias))
    }

    pub async fn obtener_resumen(&self, consulta: ConsultaEventoInput) -> AppResult<EstadisticasAsistencia> {
        self.asistencias.estadisticas_por_evento(consulta.evento()?).await
    }

    pub async fn eliminar(&self, id: i64) -> AppResult<()> {
        if !self.asistencias.eliminar(id).await? {
            return Err(AppError::validacion("Asistencia no encontrada"));
        }
        tracing::info!("Asistencia {} eliminada", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memoria::RepositoriosMemoria;
    use chrono::{Duration, TimeZone};

    struct Contexto {
        servicio: AsistenciaService,
        repos: RepositoriosMemoria,
        usuario_id: i64,
        jugador_id: i64,
        partido_id: i64,
        entrenamiento_id: i64,
    }

    async fn contexto() -> Contexto {
        let repos = RepositoriosMemoria::default();
        let (usuario_id, jugador_id) = repos.sembrar_jugador("j1@club.es").await;
        let fecha = Utc.with_ymd_and_hms(2025, 4, 5, 17, 0, 0).unwrap();
        let partido_id = repos.sembrar_partido(fecha).await;
        let entrenamiento_id = repos.sembrar_entrenamiento(fecha - Duration::days(2)).await;
        let servicio = AsistenciaService::new(
            Arc::new(repos.asistencias.clone()),
            Arc::new(repos.jugadores.clone()),
            Arc::new(repos.partidos.clone()),
            Arc::new(repos.entrenamientos.clone()),
            Arc::new(repos.catalogo.clone()),
        );
        Contexto { servicio, repos, usuario_id, jugador_id, partido_id, entrenamiento_id }
    }

    fn registro(jugador: IdentificadorJugador, partido_id: i64, estado: &str) -> RegistrarAsistenciaInput {
        RegistrarAsistenciaInput {
            jugador: Some(jugador),
            partido_id: Some(partido_id),
            estado: Some(estado.into()),
            ..Default::default()
        }
    }

    fn cambio(estado: Option<&str>, motivo: Option<i64>) -> ActualizarAsistenciaInput {
        ActualizarAsistenciaInput { estado: estado.map(String::from), motivo_ausencia_id: motivo, comentario: None }
    }

    #[tokio::test]
    async fn test_absent_without_reason_is_rejected() {
        let ctx = contexto().await;
        let err = ctx
            .servicio
            .registrar(registro(IdentificadorJugador::Jugador(ctx.jugador_id), ctx.partido_id, "ausente"))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("motivoAusenciaId es requerido"));
    }

    #[tokio::test]
    async fn test_register_then_absent_then_pending_clears_reason() {
        let ctx = contexto().await;
        let creada = ctx
            .servicio
            .registrar(registro(IdentificadorJugador::Jugador(ctx.jugador_id), ctx.partido_id, "confirmado"))
            .await
            .unwrap();
        assert_eq!(creada.partido_id, Some(ctx.partido_id));
        assert_eq!(creada.entrenamiento_id, None);

        let ausente = ctx.servicio.actualizar_estado(Some(creada.id), cambio(Some("ausente"), Some(5))).await.unwrap();
        assert_eq!(ausente.estado, EstadoAsistencia::Ausente);
        assert_eq!(ausente.motivo_ausencia_id, Some(5));

        let pendiente = ctx.servicio.actualizar_estado(Some(creada.id), cambio(Some("pendiente"), None)).await.unwrap();
        assert_eq!(pendiente.estado, EstadoAsistencia::Pendiente);
        assert_eq!(pendiente.motivo_ausencia_id, None);
    }

    #[tokio::test]
    async fn test_update_to_absent_needs_some_reason() {
        let ctx = contexto().await;
        let creada = ctx
            .servicio
            .registrar(registro(IdentificadorJugador::Usuario(ctx.usuario_id), ctx.partido_id, "confirmado"))
            .await
            .unwrap();
        let err = ctx.servicio.actualizar_estado(Some(creada.id), cambio(Some("ausente"), None)).await.unwrap_err();
        assert_eq!(err.to_string(), MOTIVO_REQUERIDO);

        // Con el motivo ya guardado no hace falta repetirlo
        ctx.servicio.actualizar_estado(Some(creada.id), cambio(None, Some(2))).await.unwrap();
        let ausente = ctx.servicio.actualizar_estado(Some(creada.id), cambio(Some("ausente"), None)).await.unwrap();
        assert_eq!(ausente.motivo_ausencia_id, Some(2));

        // Salir de "ausente" enviando un motivo explícito lo conserva
        let confirmado = ctx.servicio.actualizar_estado(Some(creada.id), cambio(Some("confirmado"), Some(3))).await.unwrap();
        assert_eq!(confirmado.motivo_ausencia_id, Some(3));
    }

    #[tokio::test]
    async fn test_update_input_checks() {
        let ctx = contexto().await;
        assert!(ctx.servicio.actualizar_estado(None, cambio(Some("confirmado"), None)).await.is_err());
        assert!(ctx.servicio.actualizar_estado(Some(1), ActualizarAsistenciaInput::default()).await.is_err());
        let err = ctx.servicio.actualizar_estado(Some(99), cambio(Some("confirmado"), None)).await.unwrap_err();
        assert!(err.to_string().contains("no encontrada"));

        let creada = ctx
            .servicio
            .registrar(registro(IdentificadorJugador::Jugador(ctx.jugador_id), ctx.partido_id, "pendiente"))
            .await
            .unwrap();
        assert!(ctx.servicio.actualizar_estado(Some(creada.id), cambio(Some("tal vez"), None)).await.is_err());

        let solo_comentario = ActualizarAsistenciaInput { comentario: Some(" Llego tarde ".into()), ..Default::default() };
        let editada = ctx.servicio.actualizar_estado(Some(creada.id), solo_comentario).await.unwrap();
        assert_eq!(editada.estado, EstadoAsistencia::Pendiente);
        assert_eq!(editada.comentario.as_deref(), Some("Llego tarde"));
    }

    #[tokio::test]
    async fn test_duplicate_registration_fails_on_second_call() {
        let ctx = contexto().await;
        let input = registro(IdentificadorJugador::Jugador(ctx.jugador_id), ctx.partido_id, "confirmado");
        ctx.servicio.registrar(input.clone()).await.unwrap();

        // El mismo jugador identificado por su usuario
        let por_usuario = RegistrarAsistenciaInput { jugador: Some(IdentificadorJugador::Usuario(ctx.usuario_id)), ..input };
        let err = ctx.servicio.registrar(por_usuario).await.unwrap_err();
        assert!(err.to_string().contains("Ya existe"));

        // Mismo id numérico pero en un entrenamiento: es otro evento
        let entrenamiento = RegistrarAsistenciaInput {
            jugador: Some(IdentificadorJugador::Jugador(ctx.jugador_id)),
            entrenamiento_id: Some(ctx.entrenamiento_id),
            estado: Some("confirmado".into()),
            ..Default::default()
        };
        ctx.servicio.registrar(entrenamiento).await.unwrap();
    }

    #[tokio::test]
    async fn test_register_input_validation_order() {
        let ctx = contexto().await;
        let base = registro(IdentificadorJugador::Jugador(ctx.jugador_id), ctx.partido_id, "confirmado");

        let sin_jugador = RegistrarAsistenciaInput { jugador: None, ..base.clone() };
        assert_eq!(ctx.servicio.registrar(sin_jugador).await.unwrap_err().to_string(), "jugador es requerido");

        let ambos = RegistrarAsistenciaInput { entrenamiento_id: Some(ctx.entrenamiento_id), ..base.clone() };
        assert!(ctx.servicio.registrar(ambos).await.unwrap_err().to_string().contains("no ambos"));

        let ninguno = RegistrarAsistenciaInput { partido_id: None, ..base.clone() };
        assert!(ctx.servicio.registrar(ninguno).await.is_err());

        let estado_malo = RegistrarAsistenciaInput { estado: Some("quizas".into()), ..base.clone() };
        assert!(ctx.servicio.registrar(estado_malo).await.is_err());

        let desconocido = RegistrarAsistenciaInput { jugador: Some(IdentificadorJugador::Usuario(999)), ..base.clone() };
        assert_eq!(ctx.servicio.registrar(desconocido).await.unwrap_err().to_string(), "Jugador no encontrado");

        let sin_partido = RegistrarAsistenciaInput { partido_id: Some(999), ..base.clone() };
        assert_eq!(ctx.servicio.registrar(sin_partido).await.unwrap_err().to_string(), "Partido no encontrado");

        let motivo_malo = RegistrarAsistenciaInput {
            estado: Some("ausente".into()),
            motivo_ausencia_id: Some(77),
            ..base
        };
        assert!(ctx.servicio.registrar(motivo_malo).await.is_err());
    }

    #[tokio::test]
    async fn test_event_queries_grouped_and_summary() {
        let ctx = contexto().await;
        let (_, j2) = ctx.repos.sembrar_jugador("j2@club.es").await;
        let (_, j3) = ctx.repos.sembrar_jugador("j3@club.es").await;
        for (jugador, estado, motivo) in [
            (ctx.jugador_id, "confirmado", None),
            (j2, "ausente", Some(1)),
            (j3, "confirmado", None),
        ] {
            let input = RegistrarAsistenciaInput {
                motivo_ausencia_id: motivo,
                ..registro(IdentificadorJugador::Jugador(jugador), ctx.partido_id, estado)
            };
            ctx.servicio.registrar(input).await.unwrap();
        }

        let consulta = ConsultaEventoInput { partido_id: Some(ctx.partido_id), entrenamiento_id: None };
        assert_eq!(ctx.servicio.obtener_por_evento(consulta).await.unwrap().len(), 3);

        let grupos = ctx.servicio.obtener_agrupadas(consulta).await.unwrap();
        assert_eq!((grupos.confirmados.len(), grupos.ausentes.len(), grupos.pendientes.len()), (2, 1, 0));

        let resumen = ctx.servicio.obtener_resumen(consulta).await.unwrap();
        assert_eq!((resumen.total, resumen.confirmados, resumen.porcentaje_asistencia), (3, 2, 67));

        // Evento sin registros: 0 %, sin error
        let vacio = ConsultaEventoInput { partido_id: None, entrenamiento_id: Some(ctx.entrenamiento_id) };
        let resumen = ctx.servicio.obtener_resumen(vacio).await.unwrap();
        assert_eq!((resumen.total, resumen.porcentaje_asistencia), (0, 0));

        assert!(ctx.servicio.obtener_por_evento(ConsultaEventoInput::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_ownership_and_delete() {
        let ctx = contexto().await;
        let creada = ctx
            .servicio
            .registrar(registro(IdentificadorJugador::Usuario(ctx.usuario_id), ctx.partido_id, "confirmado"))
            .await
            .unwrap();
        assert!(ctx.servicio.es_de_usuario(creada.id, ctx.usuario_id).await.unwrap());
        assert!(!ctx.servicio.es_de_usuario(creada.id, ctx.usuario_id + 1).await.unwrap());

        ctx.servicio.eliminar(creada.id).await.unwrap();
        assert!(ctx.servicio.eliminar(creada.id).await.is_err());
        assert!(!ctx.servicio.es_de_usuario(creada.id, ctx.usuario_id).await.unwrap());
    }
}
