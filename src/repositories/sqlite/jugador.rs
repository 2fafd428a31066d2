// src/repositories/sqlite/jugador.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        jugador::{Jugador, JugadorData},
        paginacion::{Pagina, Paginacion},
    },
    repositories::{FiltroJugadores, JugadorRepository},
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

const COLUMNAS: &str =
    "id, usuario_id, numero_dorsal, posicion_id, telefono, fecha_nacimiento, alias, foto_url, created_at";

#[derive(Debug, FromRow)]
struct JugadorRow {
    id: i64,
    usuario_id: Option<i64>,
    numero_dorsal: Option<i64>,
    posicion_id: Option<i64>,
    telefono: Option<String>,
    fecha_nacimiento: Option<NaiveDate>,
    alias: Option<String>,
    foto_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<JugadorRow> for Jugador {
    // Las filas antiguas pueden no cumplir las validaciones actuales: se rehidratan sin validar.
    fn from(row: JugadorRow) -> Self {
        Jugador::rehidratar(JugadorData {
            id: row.id,
            usuario_id: row.usuario_id,
            numero_dorsal: row.numero_dorsal,
            posicion_id: row.posicion_id,
            telefono: row.telefono,
            fecha_nacimiento: row.fecha_nacimiento,
            alias: row.alias,
            foto_url: row.foto_url,
            created_at: row.created_at,
            perfil_completo: false,
        })
    }
}

fn aplicar_filtro(qb: &mut QueryBuilder<'_, Sqlite>, filtro: &FiltroJugadores) {
    if let Some(posicion_id) = filtro.posicion_id {
        qb.push(" AND posicion_id = ").push_bind(posicion_id);
    }
}

#[derive(Clone)]
pub struct SqliteJugadorRepository {
    pool: SqlitePool,
}

impl SqliteJugadorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn filtrar(&self, filtro: &FiltroJugadores) -> AppResult<Vec<Jugador>> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM jugadores WHERE 1 = 1", COLUMNAS));
        aplicar_filtro(&mut qb, filtro);
        qb.push(" ORDER BY numero_dorsal IS NULL, numero_dorsal ASC, id ASC");
        let rows = qb.build_query_as::<JugadorRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Jugador::from).collect())
    }

    async fn buscar_uno(&self, columna: &str, valor: i64) -> AppResult<Option<Jugador>> {
        let row = sqlx::query_as::<_, JugadorRow>(&format!(
            "SELECT {} FROM jugadores WHERE {} = ?",
            COLUMNAS, columna
        ))
        .bind(valor)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Jugador::from))
    }
}

#[async_trait]
impl JugadorRepository for SqliteJugadorRepository {
    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<Jugador>> {
        tracing::debug!("Buscando jugador por id: {}", id);
        self.buscar_uno("id", id).await
    }

    async fn buscar_por_usuario_id(&self, usuario_id: i64) -> AppResult<Option<Jugador>> {
        tracing::debug!("Buscando jugador por usuario_id: {}", usuario_id);
        self.buscar_uno("usuario_id", usuario_id).await
    }

    async fn listar_paginado(&self, filtro: &FiltroJugadores, paginacion: Paginacion) -> AppResult<Pagina<Jugador>> {
        let mut conteo = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM jugadores WHERE 1 = 1");
        aplicar_filtro(&mut conteo, filtro);
        let total: i64 = conteo.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM jugadores WHERE 1 = 1", COLUMNAS));
        aplicar_filtro(&mut qb, filtro);
        qb.push(" ORDER BY numero_dorsal IS NULL, numero_dorsal ASC, id ASC LIMIT ")
            .push_bind(paginacion.limit())
            .push(" OFFSET ")
            .push_bind(paginacion.offset());
        let rows = qb.build_query_as::<JugadorRow>().fetch_all(&self.pool).await?;
        Ok(Pagina::new(rows.into_iter().map(Jugador::from).collect(), total, paginacion))
    }

    async fn listar_por_posicion(&self, posicion_id: i64) -> AppResult<Vec<Jugador>> {
        self.filtrar(&FiltroJugadores { posicion_id: Some(posicion_id) }).await
    }

    async fn existe_dorsal(&self, dorsal: i64, excluir_id: Option<i64>) -> AppResult<bool> {
        let existe: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(
                SELECT 1 FROM jugadores
                WHERE numero_dorsal = ?1 AND (?2 IS NULL OR id <> ?2)
            )"#,
        )
        .bind(dorsal)
        .bind(excluir_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(existe)
    }

    async fn crear(&self, jugador: &Jugador) -> AppResult<Jugador> {
        let data = jugador.to_object();
        let id = sqlx::query(
            r#"
            INSERT INTO jugadores
                (usuario_id, numero_dorsal, posicion_id, telefono, fecha_nacimiento, alias, foto_url, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(data.usuario_id)
        .bind(data.numero_dorsal)
        .bind(data.posicion_id)
        .bind(&data.telefono)
        .bind(data.fecha_nacimiento)
        .bind(&data.alias)
        .bind(&data.foto_url)
        .bind(data.created_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        tracing::info!("Jugador creado con id {} (usuario {:?})", id, data.usuario_id);
        self.buscar_por_id(id).await?.ok_or(AppError::InternalServerError)
    }

    async fn actualizar(&self, jugador: &Jugador) -> AppResult<Jugador> {
        let data = jugador.to_object();
        let rows_affected = sqlx::query(
            r#"
            UPDATE jugadores
            SET usuario_id = ?1, numero_dorsal = ?2, posicion_id = ?3, telefono = ?4,
                fecha_nacimiento = ?5, alias = ?6, foto_url = ?7
            WHERE id = ?8
            "#,
        )
        .bind(data.usuario_id)
        .bind(data.numero_dorsal)
        .bind(data.posicion_id)
        .bind(&data.telefono)
        .bind(data.fecha_nacimiento)
        .bind(&data.alias)
        .bind(&data.foto_url)
        .bind(data.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            tracing::warn!("No se pudo actualizar: jugador {} no existe", data.id);
            return Err(AppError::validacion(format!("Jugador {} no encontrado", data.id)));
        }
        self.buscar_por_id(data.id).await?.ok_or(AppError::InternalServerError)
    }

    async fn eliminar(&self, id: i64) -> AppResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM jugadores WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}
