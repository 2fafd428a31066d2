// src/models/paginacion.rs
use crate::error::{AppError, AppResult};
use serde::Serialize;

pub const POR_PAGINA_DEFECTO: i64 = 20;
pub const POR_PAGINA_MAX: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginacion {
    pub pagina: i64,
    pub por_pagina: i64,
}

impl Paginacion {
    pub fn new(pagina: Option<i64>, por_pagina: Option<i64>) -> AppResult<Self> {
        let pagina = pagina.unwrap_or(1);
        let por_pagina = por_pagina.unwrap_or(POR_PAGINA_DEFECTO);
        if pagina < 1 {
            return Err(AppError::validacion("pagina debe ser mayor o igual a 1"));
        }
        if !(1..=POR_PAGINA_MAX).contains(&por_pagina) {
            return Err(AppError::validacion(format!(
                "porPagina debe estar entre 1 y {}",
                POR_PAGINA_MAX
            )));
        }
        // El desplazamiento tiene que caber en un i64
        if (pagina - 1).checked_mul(por_pagina).is_none() {
            return Err(AppError::validacion("pagina fuera de rango"));
        }
        Ok(Self { pagina, por_pagina })
    }

    pub fn offset(&self) -> i64 {
        (self.pagina - 1) * self.por_pagina
    }

    pub fn limit(&self) -> i64 {
        self.por_pagina
    }
}

impl Default for Paginacion {
    fn default() -> Self {
        Self { pagina: 1, por_pagina: POR_PAGINA_DEFECTO }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagina<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub pagina: i64,
    pub por_pagina: i64,
    pub total_paginas: i64,
}

impl<T> Pagina<T> {
    pub fn new(items: Vec<T>, total: i64, paginacion: Paginacion) -> Self {
        let total_paginas = (total + paginacion.por_pagina - 1) / paginacion.por_pagina;
        Self {
            items,
            total,
            pagina: paginacion.pagina,
            por_pagina: paginacion.por_pagina,
            total_paginas,
        }
    }

    /// Convierte los elementos manteniendo los metadatos (entidad -> objeto plano).
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Pagina<U> {
        Pagina {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            pagina: self.pagina,
            por_pagina: self.por_pagina,
            total_paginas: self.total_paginas,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_and_page_count() {
        let p = Paginacion::new(Some(3), Some(10)).unwrap();
        assert_eq!(p.offset(), 20);
        let pagina = Pagina::new(vec![1, 2, 3], 23, p);
        assert_eq!(pagina.total_paginas, 3);
        assert_eq!(Pagina::<i32>::new(vec![], 0, p).total_paginas, 0);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(Paginacion::new(Some(0), None).is_err());
        assert!(Paginacion::new(None, Some(0)).is_err());
        assert!(Paginacion::new(None, Some(101)).is_err());
        assert_eq!(Paginacion::new(None, None).unwrap(), Paginacion::default());
    }

    #[test]
    fn test_huge_page_is_rejected_not_wrapped() {
        let err = Paginacion::new(Some(i64::MAX), Some(20)).unwrap_err();
        assert!(matches!(err, AppError::Validacion(_)));
        // Con un elemento por página el desplazamiento aún cabe
        assert_eq!(Paginacion::new(Some(i64::MAX), Some(1)).unwrap().offset(), i64::MAX - 1);
    }
}
