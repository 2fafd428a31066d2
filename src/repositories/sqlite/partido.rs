// src/repositories/sqlite/partido.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        paginacion::{Pagina, Paginacion},
        partido::{Partido, PartidoData, TipoPartido},
    },
    repositories::{FiltroPartidos, PartidoRepository},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

const COLUMNAS: &str =
    "id, fecha_hora, rival, lugar, tipo, es_local, creado_por, resultado, observaciones, created_at";

#[derive(Debug, FromRow)]
struct PartidoRow {
    id: i64,
    fecha_hora: DateTime<Utc>,
    rival: String,
    lugar: String,
    tipo: String,
    es_local: bool,
    creado_por: i64,
    resultado: Option<String>,
    observaciones: Option<String>,
    created_at: DateTime<Utc>,
}

impl PartidoRow {
    fn into_entidad(self) -> AppResult<Partido> {
        let id = self.id;
        let inconsistente = |e: AppError| AppError::DatosInconsistentes(format!("partido {}: {}", id, e));
        let tipo = self.tipo.parse::<TipoPartido>().map_err(inconsistente)?;
        Partido::rehidratar(PartidoData {
            id: self.id,
            fecha_hora: self.fecha_hora,
            rival: self.rival,
            lugar: self.lugar,
            tipo,
            es_local: self.es_local,
            creado_por: self.creado_por,
            resultado: self.resultado,
            observaciones: self.observaciones,
            created_at: self.created_at,
        })
        .map_err(inconsistente)
    }
}

fn aplicar_filtro(qb: &mut QueryBuilder<'_, Sqlite>, filtro: &FiltroPartidos) {
    if let Some(tipo) = filtro.tipo {
        qb.push(" AND tipo = ").push_bind(tipo.as_str().to_string());
    }
    if let Some(desde) = filtro.desde {
        qb.push(" AND fecha_hora >= ").push_bind(desde);
    }
    if let Some(hasta) = filtro.hasta {
        qb.push(" AND fecha_hora <= ").push_bind(hasta);
    }
}

fn a_entidades(rows: Vec<PartidoRow>) -> AppResult<Vec<Partido>> {
    rows.into_iter().map(PartidoRow::into_entidad).collect()
}

#[derive(Clone)]
pub struct SqlitePartidoRepository {
    pool: SqlitePool,
}

impl SqlitePartidoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn filtrar(&self, filtro: &FiltroPartidos) -> AppResult<Vec<Partido>> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM partidos WHERE 1 = 1", COLUMNAS));
        aplicar_filtro(&mut qb, filtro);
        qb.push(" ORDER BY fecha_hora ASC, id ASC");
        a_entidades(qb.build_query_as::<PartidoRow>().fetch_all(&self.pool).await?)
    }
}

#[async_trait]
impl PartidoRepository for SqlitePartidoRepository {
    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<Partido>> {
        tracing::debug!("Buscando partido por id: {}", id);
        let row = sqlx::query_as::<_, PartidoRow>(&format!("SELECT {} FROM partidos WHERE id = ?", COLUMNAS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(PartidoRow::into_entidad).transpose()
    }

    async fn listar_paginado(&self, filtro: &FiltroPartidos, paginacion: Paginacion) -> AppResult<Pagina<Partido>> {
        let mut conteo = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM partidos WHERE 1 = 1");
        aplicar_filtro(&mut conteo, filtro);
        let total: i64 = conteo.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM partidos WHERE 1 = 1", COLUMNAS));
        aplicar_filtro(&mut qb, filtro);
        qb.push(" ORDER BY fecha_hora DESC, id DESC LIMIT ")
            .push_bind(paginacion.limit())
            .push(" OFFSET ")
            .push_bind(paginacion.offset());
        let items = a_entidades(qb.build_query_as::<PartidoRow>().fetch_all(&self.pool).await?)?;
        Ok(Pagina::new(items, total, paginacion))
    }

    async fn proximos(&self, desde: DateTime<Utc>, limite: i64) -> AppResult<Vec<Partido>> {
        let rows = sqlx::query_as::<_, PartidoRow>(&format!(
            "SELECT {} FROM partidos WHERE fecha_hora >= ? ORDER BY fecha_hora ASC LIMIT ?",
            COLUMNAS
        ))
        .bind(desde)
        .bind(limite)
        .fetch_all(&self.pool)
        .await?;
        a_entidades(rows)
    }

    async fn por_rango(&self, desde: DateTime<Utc>, hasta: DateTime<Utc>) -> AppResult<Vec<Partido>> {
        self.filtrar(&FiltroPartidos { tipo: None, desde: Some(desde), hasta: Some(hasta) }).await
    }

    async fn crear(&self, partido: &Partido) -> AppResult<Partido> {
        let data = partido.to_object();
        let id = sqlx::query(
            r#"
            INSERT INTO partidos
                (fecha_hora, rival, lugar, tipo, es_local, creado_por, resultado, observaciones, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(data.fecha_hora)
        .bind(&data.rival)
        .bind(&data.lugar)
        .bind(data.tipo.as_str())
        .bind(data.es_local)
        .bind(data.creado_por)
        .bind(&data.resultado)
        .bind(&data.observaciones)
        .bind(data.created_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        tracing::info!("Partido contra '{}' creado con id {}", data.rival, id);
        self.buscar_por_id(id).await?.ok_or(AppError::InternalServerError)
    }

    async fn actualizar(&self, partido: &Partido) -> AppResult<Partido> {
        let data = partido.to_object();
        let rows_affected = sqlx::query(
            r#"
            UPDATE partidos
            SET fecha_hora = ?1, rival = ?2, lugar = ?3, tipo = ?4, es_local = ?5,
                resultado = ?6, observaciones = ?7
            WHERE id = ?8
            "#,
        )
        .bind(data.fecha_hora)
        .bind(&data.rival)
        .bind(&data.lugar)
        .bind(data.tipo.as_str())
        .bind(data.es_local)
        .bind(&data.resultado)
        .bind(&data.observaciones)
        .bind(data.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            tracing::warn!("No se pudo actualizar: partido {} no existe", data.id);
            return Err(AppError::validacion(format!("Partido {} no encontrado", data.id)));
        }
        self.buscar_por_id(data.id).await?.ok_or(AppError::InternalServerError)
    }

    async fn eliminar(&self, id: i64) -> AppResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM partidos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}
