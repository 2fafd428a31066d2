// src/repositories/sqlite/asistencia.rs
use crate::{
    error::{AppError, AppResult},
    models::asistencia::{
        Asistencia, EstadisticasAsistencia, EstadoAsistencia, EventoAsistencia, FiltroAsistencias, NuevaAsistencia,
        TipoEvento,
    },
    repositories::AsistenciaRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

const COLUMNAS: &str =
    "a.id, a.jugador_id, a.partido_id, a.entrenamiento_id, a.estado, a.motivo_ausencia_id, a.comentario, a.fecha_respuesta";

const CONTEOS: &str = r#"
    SELECT
        COALESCE(SUM(CASE WHEN a.estado = 'confirmado' THEN 1 ELSE 0 END), 0),
        COALESCE(SUM(CASE WHEN a.estado = 'ausente' THEN 1 ELSE 0 END), 0),
        COALESCE(SUM(CASE WHEN a.estado = 'pendiente' THEN 1 ELSE 0 END), 0)
    FROM asistencias a
"#;

#[derive(Debug, FromRow)]
struct AsistenciaRow {
    id: i64,
    jugador_id: i64,
    partido_id: Option<i64>,
    entrenamiento_id: Option<i64>,
    estado: String,
    motivo_ausencia_id: Option<i64>,
    comentario: Option<String>,
    fecha_respuesta: DateTime<Utc>,
}

impl AsistenciaRow {
    fn into_entidad(self) -> AppResult<Asistencia> {
        let id = self.id;
        let inconsistente = |e: AppError| AppError::DatosInconsistentes(format!("asistencia {}: {}", id, e));
        let evento = EventoAsistencia::desde_ids(self.partido_id, self.entrenamiento_id).map_err(inconsistente)?;
        let estado = self.estado.parse::<EstadoAsistencia>().map_err(inconsistente)?;
        Ok(Asistencia {
            id: self.id,
            jugador_id: self.jugador_id,
            evento,
            estado,
            motivo_ausencia_id: self.motivo_ausencia_id,
            comentario: self.comentario,
            fecha_respuesta: self.fecha_respuesta,
        })
    }
}

/// Columna de `asistencias` que referencia al evento.
fn columna_evento(evento: &EventoAsistencia) -> &'static str {
    match evento {
        EventoAsistencia::Partido(_) => "partido_id",
        EventoAsistencia::Entrenamiento(_) => "entrenamiento_id",
    }
}

fn a_entidades(rows: Vec<AsistenciaRow>) -> AppResult<Vec<Asistencia>> {
    rows.into_iter().map(AsistenciaRow::into_entidad).collect()
}

#[derive(Clone)]
pub struct SqliteAsistenciaRepository {
    pool: SqlitePool,
}

impl SqliteAsistenciaRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AsistenciaRepository for SqliteAsistenciaRepository {
    async fn registrar(&self, nueva: &NuevaAsistencia) -> AppResult<Asistencia> {
        let id = sqlx::query(
            r#"
            INSERT INTO asistencias
                (jugador_id, partido_id, entrenamiento_id, estado, motivo_ausencia_id, comentario, fecha_respuesta)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(nueva.jugador_id)
        .bind(nueva.evento.partido_id())
        .bind(nueva.evento.entrenamiento_id())
        .bind(nueva.estado.as_str())
        .bind(nueva.motivo_ausencia_id)
        .bind(&nueva.comentario)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        tracing::info!(
            "Asistencia {} registrada: jugador {} -> {} {} ({})",
            id,
            nueva.jugador_id,
            nueva.evento.tipo().as_str(),
            nueva.evento.id(),
            nueva.estado
        );
        self.buscar_por_id(id).await?.ok_or(AppError::InternalServerError)
    }

    async fn actualizar(&self, asistencia: &Asistencia) -> AppResult<Asistencia> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE asistencias
            SET estado = ?1, motivo_ausencia_id = ?2, comentario = ?3, fecha_respuesta = ?4
            WHERE id = ?5
            "#,
        )
        .bind(asistencia.estado.as_str())
        .bind(asistencia.motivo_ausencia_id)
        .bind(&asistencia.comentario)
        .bind(asistencia.fecha_respuesta)
        .bind(asistencia.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            tracing::warn!("No se pudo actualizar: asistencia {} no existe", asistencia.id);
            return Err(AppError::validacion(format!("Asistencia {} no encontrada", asistencia.id)));
        }
        self.buscar_por_id(asistencia.id).await?.ok_or(AppError::InternalServerError)
    }

    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<Asistencia>> {
        let row = sqlx::query_as::<_, AsistenciaRow>(&format!("SELECT {} FROM asistencias a WHERE a.id = ?", COLUMNAS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(AsistenciaRow::into_entidad).transpose()
    }

    async fn buscar_por_jugador_y_evento(
        &self,
        jugador_id: i64,
        evento: EventoAsistencia,
    ) -> AppResult<Option<Asistencia>> {
        let row = sqlx::query_as::<_, AsistenciaRow>(&format!(
            "SELECT {} FROM asistencias a WHERE a.jugador_id = ? AND a.{} = ?",
            COLUMNAS,
            columna_evento(&evento)
        ))
        .bind(jugador_id)
        .bind(evento.id())
        .fetch_optional(&self.pool)
        .await?;
        row.map(AsistenciaRow::into_entidad).transpose()
    }

    async fn listar_por_evento(&self, evento: EventoAsistencia) -> AppResult<Vec<Asistencia>> {
        let rows = sqlx::query_as::<_, AsistenciaRow>(&format!(
            "SELECT {} FROM asistencias a WHERE a.{} = ? ORDER BY a.id ASC",
            COLUMNAS,
            columna_evento(&evento)
        ))
        .bind(evento.id())
        .fetch_all(&self.pool)
        .await?;
        a_entidades(rows)
    }

    async fn listar_por_jugador(&self, jugador_id: i64, filtro: &FiltroAsistencias) -> AppResult<Vec<Asistencia>> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            r#"SELECT {} FROM asistencias a
               LEFT JOIN partidos p ON p.id = a.partido_id
               LEFT JOIN entrenamientos e ON e.id = a.entrenamiento_id
               WHERE a.jugador_id = "#,
            COLUMNAS
        ));
        qb.push_bind(jugador_id);
        match filtro.tipo {
            Some(TipoEvento::Partido) => {
                qb.push(" AND a.partido_id IS NOT NULL");
            }
            Some(TipoEvento::Entrenamiento) => {
                qb.push(" AND a.entrenamiento_id IS NOT NULL");
            }
            None => {}
        }
        if let Some(desde) = filtro.fecha_desde {
            qb.push(" AND COALESCE(p.fecha_hora, e.fecha_hora) >= ").push_bind(desde);
        }
        if let Some(hasta) = filtro.fecha_hasta {
            qb.push(" AND COALESCE(p.fecha_hora, e.fecha_hora) <= ").push_bind(hasta);
        }
        qb.push(" ORDER BY COALESCE(p.fecha_hora, e.fecha_hora) DESC, a.id DESC");

        a_entidades(qb.build_query_as::<AsistenciaRow>().fetch_all(&self.pool).await?)
    }

    async fn estadisticas_por_jugador(
        &self,
        jugador_id: i64,
        tipo: TipoEvento,
        filtro: &FiltroAsistencias,
    ) -> AppResult<EstadisticasAsistencia> {
        let join = match tipo {
            TipoEvento::Partido => " JOIN partidos ev ON ev.id = a.partido_id",
            TipoEvento::Entrenamiento => " JOIN entrenamientos ev ON ev.id = a.entrenamiento_id",
        };
        let mut qb = QueryBuilder::<Sqlite>::new(CONTEOS);
        qb.push(join).push(" WHERE a.jugador_id = ").push_bind(jugador_id);
        if let Some(desde) = filtro.fecha_desde {
            qb.push(" AND ev.fecha_hora >= ").push_bind(desde);
        }
        if let Some(hasta) = filtro.fecha_hasta {
            qb.push(" AND ev.fecha_hora <= ").push_bind(hasta);
        }

        let (confirmados, ausentes, pendientes) =
            qb.build_query_as::<(i64, i64, i64)>().fetch_one(&self.pool).await?;
        Ok(EstadisticasAsistencia::desde_conteos(confirmados, ausentes, pendientes))
    }

    async fn estadisticas_por_evento(&self, evento: EventoAsistencia) -> AppResult<EstadisticasAsistencia> {
        let (confirmados, ausentes, pendientes) = sqlx::query_as::<_, (i64, i64, i64)>(&format!(
            "{} WHERE a.{} = ?",
            CONTEOS,
            columna_evento(&evento)
        ))
        .bind(evento.id())
        .fetch_one(&self.pool)
        .await?;
        Ok(EstadisticasAsistencia::desde_conteos(confirmados, ausentes, pendientes))
    }

    async fn eliminar(&self, id: i64) -> AppResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM asistencias WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}
