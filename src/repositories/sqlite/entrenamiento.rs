// src/repositories/sqlite/entrenamiento.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        entrenamiento::{Entrenamiento, EntrenamientoData},
        paginacion::{Pagina, Paginacion},
    },
    repositories::{EntrenamientoRepository, FiltroEntrenamientos},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

const COLUMNAS: &str = "id, fecha_hora, lugar, descripcion, duracion_minutos, creado_por, created_at";

#[derive(Debug, FromRow)]
struct EntrenamientoRow {
    id: i64,
    fecha_hora: DateTime<Utc>,
    lugar: String,
    descripcion: Option<String>,
    duracion_minutos: i64,
    creado_por: i64,
    created_at: DateTime<Utc>,
}

impl EntrenamientoRow {
    fn into_entidad(self) -> AppResult<Entrenamiento> {
        let id = self.id;
        Entrenamiento::rehidratar(EntrenamientoData {
            id: self.id,
            fecha_hora: self.fecha_hora,
            lugar: self.lugar,
            descripcion: self.descripcion,
            duracion_minutos: self.duracion_minutos,
            creado_por: self.creado_por,
            created_at: self.created_at,
        })
        .map_err(|e| AppError::DatosInconsistentes(format!("entrenamiento {}: {}", id, e)))
    }
}

fn aplicar_filtro(qb: &mut QueryBuilder<'_, Sqlite>, filtro: &FiltroEntrenamientos) {
    if let Some(desde) = filtro.desde {
        qb.push(" AND fecha_hora >= ").push_bind(desde);
    }
    if let Some(hasta) = filtro.hasta {
        qb.push(" AND fecha_hora <= ").push_bind(hasta);
    }
}

fn a_entidades(rows: Vec<EntrenamientoRow>) -> AppResult<Vec<Entrenamiento>> {
    rows.into_iter().map(EntrenamientoRow::into_entidad).collect()
}

#[derive(Clone)]
pub struct SqliteEntrenamientoRepository {
    pool: SqlitePool,
}

impl SqliteEntrenamientoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn filtrar(&self, filtro: &FiltroEntrenamientos) -> AppResult<Vec<Entrenamiento>> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM entrenamientos WHERE 1 = 1", COLUMNAS));
        aplicar_filtro(&mut qb, filtro);
        qb.push(" ORDER BY fecha_hora ASC, id ASC");
        a_entidades(qb.build_query_as::<EntrenamientoRow>().fetch_all(&self.pool).await?)
    }
}

#[async_trait]
impl EntrenamientoRepository for SqliteEntrenamientoRepository {
    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<Entrenamiento>> {
        tracing::debug!("Buscando entrenamiento por id: {}", id);
        let row = sqlx::query_as::<_, EntrenamientoRow>(&format!(
            "SELECT {} FROM entrenamientos WHERE id = ?",
            COLUMNAS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(EntrenamientoRow::into_entidad).transpose()
    }

    async fn listar_paginado(
        &self,
        filtro: &FiltroEntrenamientos,
        paginacion: Paginacion,
    ) -> AppResult<Pagina<Entrenamiento>> {
        let mut conteo = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM entrenamientos WHERE 1 = 1");
        aplicar_filtro(&mut conteo, filtro);
        let total: i64 = conteo.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM entrenamientos WHERE 1 = 1", COLUMNAS));
        aplicar_filtro(&mut qb, filtro);
        qb.push(" ORDER BY fecha_hora DESC, id DESC LIMIT ")
            .push_bind(paginacion.limit())
            .push(" OFFSET ")
            .push_bind(paginacion.offset());
        let items = a_entidades(qb.build_query_as::<EntrenamientoRow>().fetch_all(&self.pool).await?)?;
        Ok(Pagina::new(items, total, paginacion))
    }

    async fn proximos(&self, desde: DateTime<Utc>, limite: i64) -> AppResult<Vec<Entrenamiento>> {
        let rows = sqlx::query_as::<_, EntrenamientoRow>(&format!(
            "SELECT {} FROM entrenamientos WHERE fecha_hora >= ? ORDER BY fecha_hora ASC LIMIT ?",
            COLUMNAS
        ))
        .bind(desde)
        .bind(limite)
        .fetch_all(&self.pool)
        .await?;
        a_entidades(rows)
    }

    async fn por_rango(&self, desde: DateTime<Utc>, hasta: DateTime<Utc>) -> AppResult<Vec<Entrenamiento>> {
        self.filtrar(&FiltroEntrenamientos { desde: Some(desde), hasta: Some(hasta) }).await
    }

    async fn crear(&self, entrenamiento: &Entrenamiento) -> AppResult<Entrenamiento> {
        let data = entrenamiento.to_object();
        let id = sqlx::query(
            r#"
            INSERT INTO entrenamientos (fecha_hora, lugar, descripcion, duracion_minutos, creado_por, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(data.fecha_hora)
        .bind(&data.lugar)
        .bind(&data.descripcion)
        .bind(data.duracion_minutos)
        .bind(data.creado_por)
        .bind(data.created_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        tracing::info!("Entrenamiento en '{}' creado con id {}", data.lugar, id);
        self.buscar_por_id(id).await?.ok_or(AppError::InternalServerError)
    }

    async fn actualizar(&self, entrenamiento: &Entrenamiento) -> AppResult<Entrenamiento> {
        let data = entrenamiento.to_object();
        let rows_affected = sqlx::query(
            r#"
            UPDATE entrenamientos
            SET fecha_hora = ?1, lugar = ?2, descripcion = ?3, duracion_minutos = ?4
            WHERE id = ?5
            "#,
        )
        .bind(data.fecha_hora)
        .bind(&data.lugar)
        .bind(&data.descripcion)
        .bind(data.duracion_minutos)
        .bind(data.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            tracing::warn!("No se pudo actualizar: entrenamiento {} no existe", data.id);
            return Err(AppError::validacion(format!("Entrenamiento {} no encontrado", data.id)));
        }
        self.buscar_por_id(data.id).await?.ok_or(AppError::InternalServerError)
    }

    async fn eliminar(&self, id: i64) -> AppResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM entrenamientos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}
