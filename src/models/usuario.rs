// src/models/usuario.rs
use crate::error::{AppError, AppResult};
use crate::models::validacion::{validar_email, validar_nombre};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rol {
    Jugador,
    Gestor,
}

impl Rol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rol::Jugador => "jugador",
            Rol::Gestor => "gestor",
        }
    }
}

impl fmt::Display for Rol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rol {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jugador" => Ok(Rol::Jugador),
            "gestor" => Ok(Rol::Gestor),
            otro => Err(AppError::validacion(format!(
                "rol '{}' no es válido (jugador, gestor)",
                otro
            ))),
        }
    }
}

/// Representación completa, usada para persistencia. Incluye el hash de la contraseña.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioData {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub nombre: String,
    pub rol: Rol,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
}

/// Vista segura: lo único que sale hacia los clientes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioPublico {
    pub id: i64,
    pub email: String,
    pub nombre: String,
    pub rol: Rol,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Usuario {
    id: i64,
    email: String,
    password: String,
    nombre: String,
    rol: Rol,
    activo: bool,
    created_at: DateTime<Utc>,
}

impl Usuario {
    /// Crea un usuario nuevo (id 0 hasta persistirse). `password_hash` ya viene hasheado.
    pub fn new(email: &str, password_hash: String, nombre: &str, rol: Rol) -> AppResult<Self> {
        validar_email(email)?;
        validar_nombre(nombre)?;
        if password_hash.is_empty() {
            return Err(AppError::validacion("password es requerido"));
        }
        Ok(Self {
            id: 0,
            email: normalizar_email(email),
            password: password_hash,
            nombre: nombre.trim().to_string(),
            rol,
            activo: true,
            created_at: Utc::now(),
        })
    }

    /// Reconstruye desde almacenamiento, revalidando los campos.
    pub fn rehidratar(data: UsuarioData) -> AppResult<Self> {
        validar_email(&data.email)?;
        validar_nombre(&data.nombre)?;
        Ok(Self {
            id: data.id,
            email: data.email,
            password: data.password,
            nombre: data.nombre,
            rol: data.rol,
            activo: data.activo,
            created_at: data.created_at,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password
    }

    pub fn nombre(&self) -> &str {
        &self.nombre
    }

    pub fn rol(&self) -> Rol {
        self.rol
    }

    pub fn activo(&self) -> bool {
        self.activo
    }

    pub fn es_gestor(&self) -> bool {
        self.rol == Rol::Gestor
    }

    pub fn cambiar_nombre(&mut self, nombre: &str) -> AppResult<()> {
        validar_nombre(nombre)?;
        self.nombre = nombre.trim().to_string();
        Ok(())
    }

    pub fn cambiar_email(&mut self, email: &str) -> AppResult<()> {
        validar_email(email)?;
        self.email = normalizar_email(email);
        Ok(())
    }

    pub fn cambiar_password_hash(&mut self, password_hash: String) -> AppResult<()> {
        if password_hash.is_empty() {
            return Err(AppError::validacion("password es requerido"));
        }
        self.password = password_hash;
        Ok(())
    }

    pub fn activar(&mut self) {
        self.activo = true;
    }

    pub fn desactivar(&mut self) {
        self.activo = false;
    }

    pub fn to_object(&self) -> UsuarioData {
        UsuarioData {
            id: self.id,
            email: self.email.clone(),
            password: self.password.clone(),
            nombre: self.nombre.clone(),
            rol: self.rol,
            activo: self.activo,
            created_at: self.created_at,
        }
    }

    pub fn to_safe_object(&self) -> UsuarioPublico {
        UsuarioPublico {
            id: self.id,
            email: self.email.clone(),
            nombre: self.nombre.clone(),
            rol: self.rol,
            activo: self.activo,
            created_at: self.created_at,
        }
    }
}

pub fn normalizar_email(email: &str) -> String {
    email.trim().to_lowercase()
}
