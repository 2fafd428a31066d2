// src/repositories/sqlite/usuario.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        paginacion::{Pagina, Paginacion},
        usuario::{Rol, Usuario, UsuarioData},
    },
    repositories::{FiltroUsuarios, UsuarioRepository},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

const COLUMNAS: &str = "id, email, password_hash, nombre, rol, activo, created_at";

/// Fila tal como está en la tabla `usuarios`.
#[derive(Debug, FromRow)]
struct UsuarioRow {
    id: i64,
    email: String,
    password_hash: String,
    nombre: String,
    rol: String,
    activo: bool,
    created_at: DateTime<Utc>,
}

impl UsuarioRow {
    fn into_entidad(self) -> AppResult<Usuario> {
        let rol = self
            .rol
            .parse::<Rol>()
            .map_err(|e| AppError::DatosInconsistentes(format!("usuario {}: {}", self.id, e)))?;
        let id = self.id;
        Usuario::rehidratar(UsuarioData {
            id: self.id,
            email: self.email,
            password: self.password_hash,
            nombre: self.nombre,
            rol,
            activo: self.activo,
            created_at: self.created_at,
        })
        .map_err(|e| AppError::DatosInconsistentes(format!("usuario {}: {}", id, e)))
    }
}

fn aplicar_filtro(qb: &mut QueryBuilder<'_, Sqlite>, filtro: &FiltroUsuarios) {
    if let Some(rol) = filtro.rol {
        qb.push(" AND rol = ").push_bind(rol.as_str().to_string());
    }
    if let Some(activo) = filtro.activo {
        qb.push(" AND activo = ").push_bind(activo);
    }
}

#[derive(Clone)]
pub struct SqliteUsuarioRepository {
    pool: SqlitePool,
}

impl SqliteUsuarioRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsuarioRepository for SqliteUsuarioRepository {
    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<Usuario>> {
        tracing::debug!("Buscando usuario por id: {}", id);
        let row = sqlx::query_as::<_, UsuarioRow>(&format!("SELECT {} FROM usuarios WHERE id = ?", COLUMNAS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(UsuarioRow::into_entidad).transpose()
    }

    async fn buscar_por_email(&self, email: &str) -> AppResult<Option<Usuario>> {
        tracing::debug!("Buscando usuario por email: {}", email);
        let row = sqlx::query_as::<_, UsuarioRow>(&format!(
            "SELECT {} FROM usuarios WHERE email = ? COLLATE NOCASE",
            COLUMNAS
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;
        row.map(UsuarioRow::into_entidad).transpose()
    }

    async fn listar_paginado(&self, filtro: &FiltroUsuarios, paginacion: Paginacion) -> AppResult<Pagina<Usuario>> {
        let mut conteo = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM usuarios WHERE 1 = 1");
        aplicar_filtro(&mut conteo, filtro);
        let total: i64 = conteo.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM usuarios WHERE 1 = 1", COLUMNAS));
        aplicar_filtro(&mut qb, filtro);
        qb.push(" ORDER BY nombre ASC, id ASC LIMIT ")
            .push_bind(paginacion.limit())
            .push(" OFFSET ")
            .push_bind(paginacion.offset());
        let rows = qb.build_query_as::<UsuarioRow>().fetch_all(&self.pool).await?;
        let items = rows
            .into_iter()
            .map(UsuarioRow::into_entidad)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Pagina::new(items, total, paginacion))
    }

    async fn crear(&self, usuario: &Usuario) -> AppResult<Usuario> {
        let data = usuario.to_object();
        let id = sqlx::query(
            r#"
            INSERT INTO usuarios (email, password_hash, nombre, rol, activo, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&data.email)
        .bind(&data.password)
        .bind(&data.nombre)
        .bind(data.rol.as_str())
        .bind(data.activo)
        .bind(data.created_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        tracing::info!("Usuario '{}' creado con id {}", data.email, id);
        self.buscar_por_id(id).await?.ok_or(AppError::InternalServerError)
    }

    async fn actualizar(&self, usuario: &Usuario) -> AppResult<Usuario> {
        let data = usuario.to_object();
        let rows_affected = sqlx::query(
            r#"
            UPDATE usuarios
            SET email = ?1, password_hash = ?2, nombre = ?3, activo = ?4
            WHERE id = ?5
            "#,
        )
        .bind(&data.email)
        .bind(&data.password)
        .bind(&data.nombre)
        .bind(data.activo)
        .bind(data.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            tracing::warn!("No se pudo actualizar: usuario {} no existe", data.id);
            return Err(AppError::validacion(format!("Usuario {} no encontrado", data.id)));
        }
        self.buscar_por_id(data.id).await?.ok_or(AppError::InternalServerError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool_en_memoria;

    #[tokio::test]
    async fn test_create_find_and_update() {
        let repo = SqliteUsuarioRepository::new(pool_en_memoria().await);
        let nuevo = Usuario::new("gestor@club.es", "hash".into(), "Gestora", Rol::Gestor).unwrap();
        let creado = repo.crear(&nuevo).await.unwrap();
        assert!(creado.id() > 0);

        let encontrado = repo.buscar_por_email("GESTOR@club.es").await.unwrap().unwrap();
        assert_eq!(encontrado.id(), creado.id());
        assert_eq!(encontrado.rol(), Rol::Gestor);

        let mut editado = encontrado.clone();
        editado.cambiar_nombre("Gestora Jefa").unwrap();
        editado.desactivar();
        let guardado = repo.actualizar(&editado).await.unwrap();
        assert_eq!(guardado.nombre(), "Gestora Jefa");
        assert!(!guardado.activo());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_storage_error() {
        let repo = SqliteUsuarioRepository::new(pool_en_memoria().await);
        let u = Usuario::new("a@club.es", "hash".into(), "Ana", Rol::Jugador).unwrap();
        repo.crear(&u).await.unwrap();
        let err = repo.crear(&u).await.unwrap_err();
        assert!(matches!(err, AppError::SqlxError(_)));
    }

    #[tokio::test]
    async fn test_paginated_listing_with_filter() {
        let repo = SqliteUsuarioRepository::new(pool_en_memoria().await);
        for i in 0..5 {
            let rol = if i % 2 == 0 { Rol::Jugador } else { Rol::Gestor };
            let u = Usuario::new(&format!("u{}@club.es", i), "hash".into(), &format!("Usuario {}", i), rol).unwrap();
            repo.crear(&u).await.unwrap();
        }
        let filtro = FiltroUsuarios { rol: Some(Rol::Jugador), activo: None };
        let pagina = repo
            .listar_paginado(&filtro, Paginacion::new(Some(1), Some(2)).unwrap())
            .await
            .unwrap();
        assert_eq!(pagina.total, 3);
        assert_eq!(pagina.items.len(), 2);
        assert_eq!(pagina.total_paginas, 2);
        let todos = repo
            .listar_paginado(&FiltroUsuarios::default(), Paginacion::default())
            .await
            .unwrap();
        assert_eq!(todos.total, 5);
    }
}
