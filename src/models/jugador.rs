// src/models/jugador.rs
use crate::error::{AppError, AppResult};
use crate::models::validacion::{validar_dorsal, validar_id_positivo, validar_telefono};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Datos de entrada para crear un perfil de jugador validado.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevoJugador {
    pub usuario_id: Option<i64>,
    pub numero_dorsal: Option<i64>,
    pub posicion_id: Option<i64>,
    pub telefono: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub alias: Option<String>,
    pub foto_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JugadorData {
    pub id: i64,
    pub usuario_id: Option<i64>,
    pub numero_dorsal: Option<i64>,
    pub posicion_id: Option<i64>,
    pub telefono: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub alias: Option<String>,
    pub foto_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub perfil_completo: bool,
}

#[derive(Debug, Clone)]
pub struct Jugador {
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

impl Jugador {
    /// Constructor validado para perfiles nuevos: exige `usuario_id`.
    pub fn new(datos: NuevoJugador) -> AppResult<Self> {
        let usuario_id = datos
            .usuario_id
            .ok_or_else(|| AppError::validacion("usuarioId es requerido"))?;
        validar_id_positivo("usuarioId", usuario_id)?;

        let mut jugador = Self {
            id: 0,
            usuario_id: Some(usuario_id),
            numero_dorsal: None,
            posicion_id: None,
            telefono: None,
            fecha_nacimiento: None,
            alias: None,
            foto_url: None,
            created_at: Utc::now(),
        };
        jugador.asignar_dorsal(datos.numero_dorsal)?;
        jugador.cambiar_posicion(datos.posicion_id)?;
        jugador.actualizar_contacto(datos.telefono)?;
        jugador.cambiar_fecha_nacimiento(datos.fecha_nacimiento)?;
        jugador.cambiar_alias(datos.alias);
        jugador.cambiar_foto_url(datos.foto_url);
        Ok(jugador)
    }

    /// Reconstrucción desde almacenamiento sin validar.
    ///
    /// Existen filas antiguas sin `usuario_id` o con teléfonos en formato local;
    /// cargarlas no debe fallar. Cualquier mutación posterior sí valida su campo.
    pub fn rehidratar(data: JugadorData) -> Self {
        Self {
            id: data.id,
            usuario_id: data.usuario_id,
            numero_dorsal: data.numero_dorsal,
            posicion_id: data.posicion_id,
            telefono: data.telefono,
            fecha_nacimiento: data.fecha_nacimiento,
            alias: data.alias,
            foto_url: data.foto_url,
            created_at: data.created_at,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn usuario_id(&self) -> Option<i64> {
        self.usuario_id
    }

    pub fn numero_dorsal(&self) -> Option<i64> {
        self.numero_dorsal
    }

    pub fn posicion_id(&self) -> Option<i64> {
        self.posicion_id
    }

    pub fn telefono(&self) -> Option<&str> {
        self.telefono.as_deref()
    }

    pub fn fecha_nacimiento(&self) -> Option<NaiveDate> {
        self.fecha_nacimiento
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn foto_url(&self) -> Option<&str> {
        self.foto_url.as_deref()
    }

    /// Perfil completo = dorsal, posición, teléfono y fecha de nacimiento presentes.
    pub fn perfil_completo(&self) -> bool {
        self.numero_dorsal.is_some()
            && self.posicion_id.is_some()
            && self.telefono.is_some()
            && self.fecha_nacimiento.is_some()
    }

    /// `None` libera el dorsal. La unicidad entre jugadores la comprueba el servicio.
    pub fn asignar_dorsal(&mut self, dorsal: Option<i64>) -> AppResult<()> {
        if let Some(d) = dorsal {
            validar_dorsal(d)?;
        }
        self.numero_dorsal = dorsal;
        Ok(())
    }

    pub fn cambiar_posicion(&mut self, posicion_id: Option<i64>) -> AppResult<()> {
        if let Some(id) = posicion_id {
            validar_id_positivo("posicionId", id)?;
        }
        self.posicion_id = posicion_id;
        Ok(())
    }

    pub fn actualizar_contacto(&mut self, telefono: Option<String>) -> AppResult<()> {
        let telefono = telefono.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        if let Some(t) = &telefono {
            validar_telefono(t)?;
        }
        self.telefono = telefono;
        Ok(())
    }

    pub fn cambiar_fecha_nacimiento(&mut self, fecha: Option<NaiveDate>) -> AppResult<()> {
        if let Some(f) = fecha {
            if f > Utc::now().date_naive() {
                return Err(AppError::validacion("fechaNacimiento no puede ser futura"));
            }
        }
        self.fecha_nacimiento = fecha;
        Ok(())
    }

    pub fn cambiar_alias(&mut self, alias: Option<String>) {
        self.alias = limpiar_opcional(alias);
    }

    pub fn cambiar_foto_url(&mut self, foto_url: Option<String>) {
        self.foto_url = limpiar_opcional(foto_url);
    }

    /// Fecha de nacimiento, alias y foto de una vez; si la fecha no es válida no cambia nada.
    pub fn actualizar_datos_personales(
        &mut self,
        fecha_nacimiento: Option<NaiveDate>,
        alias: Option<String>,
        foto_url: Option<String>,
    ) -> AppResult<()> {
        self.cambiar_fecha_nacimiento(fecha_nacimiento)?;
        self.cambiar_alias(alias);
        self.cambiar_foto_url(foto_url);
        Ok(())
    }

    pub fn vincular_usuario(&mut self, usuario_id: i64) -> AppResult<()> {
        validar_id_positivo("usuarioId", usuario_id)?;
        self.usuario_id = Some(usuario_id);
        Ok(())
    }

    pub fn to_object(&self) -> JugadorData {
        JugadorData {
            id: self.id,
            usuario_id: self.usuario_id,
            numero_dorsal: self.numero_dorsal,
            posicion_id: self.posicion_id,
            telefono: self.telefono.clone(),
            fecha_nacimiento: self.fecha_nacimiento,
            alias: self.alias.clone(),
            foto_url: self.foto_url.clone(),
            created_at: self.created_at,
            perfil_completo: self.perfil_completo(),
        }
    }
}

fn limpiar_opcional(valor: Option<String>) -> Option<String> {
    valor.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completo() -> NuevoJugador {
        NuevoJugador {
            usuario_id: Some(1),
            numero_dorsal: Some(10),
            posicion_id: Some(3),
            telefono: Some("+34600111222".into()),
            fecha_nacimiento: NaiveDate::from_ymd_opt(1998, 4, 2),
            alias: Some("Pichichi".into()),
            foto_url: None,
        }
    }

    #[test]
    fn test_complete_profile_requires_all_four_fields() {
        let jugador = Jugador::new(completo()).unwrap();
        assert!(jugador.perfil_completo());

        for quitar in 0..4 {
            let mut j = Jugador::new(completo()).unwrap();
            match quitar {
                0 => j.asignar_dorsal(None).unwrap(),
                1 => j.cambiar_posicion(None).unwrap(),
                2 => j.actualizar_contacto(None).unwrap(),
                _ => j.cambiar_fecha_nacimiento(None).unwrap(),
            }
            assert!(!j.perfil_completo(), "campo {} ausente", quitar);
        }
    }

    #[test]
    fn test_new_requires_usuario() {
        let datos = NuevoJugador { usuario_id: None, ..completo() };
        assert!(Jugador::new(datos).is_err());
    }

    #[test]
    fn test_new_validates_fields() {
        assert!(Jugador::new(NuevoJugador { numero_dorsal: Some(100), ..completo() }).is_err());
        assert!(Jugador::new(NuevoJugador { telefono: Some("612345678".into()), ..completo() }).is_err());
        assert!(Jugador::new(NuevoJugador { posicion_id: Some(0), ..completo() }).is_err());
    }

    #[test]
    fn test_failed_mutation_keeps_previous_value() {
        let mut j = Jugador::new(completo()).unwrap();
        assert!(j.asignar_dorsal(Some(120)).is_err());
        assert_eq!(j.numero_dorsal(), Some(10));
        assert!(j.actualizar_contacto(Some("abc".into())).is_err());
        assert_eq!(j.telefono(), Some("+34600111222"));
    }

    #[test]
    fn test_rehidratar_accepts_legacy_rows() {
        let legacy = JugadorData {
            id: 7,
            usuario_id: None,
            numero_dorsal: Some(5),
            posicion_id: None,
            telefono: Some("600111222".into()),
            fecha_nacimiento: None,
            alias: None,
            foto_url: None,
            created_at: Utc::now(),
            perfil_completo: false,
        };
        let j = Jugador::rehidratar(legacy);
        assert_eq!(j.id(), 7);
        assert_eq!(j.usuario_id(), None);
        assert_eq!(j.telefono(), Some("600111222"));
    }

    #[test]
    fn test_blank_contact_clears_phone() {
        let mut j = Jugador::new(completo()).unwrap();
        j.actualizar_contacto(Some("   ".into())).unwrap();
        assert_eq!(j.telefono(), None);
    }
}
