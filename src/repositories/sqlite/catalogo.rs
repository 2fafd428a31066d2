// src/repositories/sqlite/catalogo.rs
use crate::{
    error::AppResult,
    models::catalogo::{MotivoAusencia, Posicion},
    repositories::CatalogoRepository,
};
use async_trait::async_trait;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct SqliteCatalogoRepository {
    pool: SqlitePool,
}

impl SqliteCatalogoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogoRepository for SqliteCatalogoRepository {
    async fn listar_posiciones(&self) -> AppResult<Vec<Posicion>> {
        let posiciones = sqlx::query_as::<_, Posicion>("SELECT id, nombre FROM posiciones ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(posiciones)
    }

    async fn listar_motivos_ausencia(&self) -> AppResult<Vec<MotivoAusencia>> {
        let motivos = sqlx::query_as::<_, MotivoAusencia>("SELECT id, descripcion FROM motivos_ausencia ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(motivos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool_en_memoria;

    #[tokio::test]
    async fn test_seeded_catalogs() {
        let repo = SqliteCatalogoRepository::new(pool_en_memoria().await);
        let posiciones = repo.listar_posiciones().await.unwrap();
        assert_eq!(posiciones.len(), 4);
        assert_eq!(posiciones[0].nombre, "Portero");

        let motivos = repo.listar_motivos_ausencia().await.unwrap();
        assert_eq!(motivos.len(), 6);
        assert_eq!(motivos[0].descripcion, "Lesión");
    }
}
