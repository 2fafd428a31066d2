// src/services/usuario_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        paginacion::{Pagina, Paginacion},
        usuario::{normalizar_email, Rol, Usuario, UsuarioPublico},
    },
    repositories::{FiltroUsuarios, UsuarioRepository},
    services::{auth_service::PasswordHasher, requerido},
};
use serde::Deserialize;
use std::sync::Arc;

pub const PASSWORD_MIN: usize = 6;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistroInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub nombre: Option<String>,
    /// Por defecto `jugador`.
    pub rol: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarPerfilInput {
    pub nombre: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CambiarPasswordInput {
    pub password_actual: Option<String>,
    pub password_nueva: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListarUsuariosInput {
    pub rol: Option<String>,
    pub activo: Option<bool>,
    pub pagina: Option<i64>,
    pub por_pagina: Option<i64>,
}

fn validar_password(password: &str) -> AppResult<()> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(AppError::validacion(format!(
            "password debe tener al menos {} caracteres",
            PASSWORD_MIN
        )));
    }
    Ok(())
}

pub struct UsuarioService {
    usuarios: Arc<dyn UsuarioRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UsuarioService {
    pub fn new(usuarios: Arc<dyn UsuarioRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { usuarios, hasher }
    }

    async fn cargar(&self, usuario_id: i64) -> AppResult<Usuario> {
        self.usuarios
            .buscar_por_id(usuario_id)
            .await?
            .ok_or_else(|| AppError::validacion("Usuario no encontrado"))
    }

    pub async fn registrar(&self, input: RegistroInput) -> AppResult<UsuarioPublico> {
        let email = requerido("email", input.email)?;
        let password = requerido("password", input.password)?;
        let nombre = requerido("nombre", input.nombre)?;
        let rol = match input.rol.as_deref() {
            Some(rol) => rol.parse::<Rol>()?,
            None => Rol::Jugador,
        };
        validar_password(&password)?;

        // Valida email/nombre antes de gastar un hash bcrypt
        let borrador = Usuario::new(&email, "pendiente".to_string(), &nombre, rol)?;
        if self.usuarios.buscar_por_email(borrador.email()).await?.is_some() {
            tracing::warn!("Registro rechazado: el email '{}' ya existe", borrador.email());
            return Err(AppError::validacion("Ya existe un usuario con ese email"));
        }

        let hash = self.hasher.hash(&password).await?;
        let usuario = Usuario::new(&email, hash, &nombre, rol)?;
        let creado = self.usuarios.crear(&usuario).await?;
        tracing::info!("Usuario {} registrado como {}", creado.id(), creado.rol());
        Ok(creado.to_safe_object())
    }

    /// Comprueba las credenciales del login. El mismo error para email desconocido
    /// y contraseña incorrecta.
    pub async fn verificar_credenciales(&self, input: LoginInput) -> AppResult<UsuarioPublico> {
        let email = requerido("email", input.email)?;
        let password = requerido("password", input.password)?;

        let Some(usuario) = self.usuarios.buscar_por_email(&normalizar_email(&email)).await? else {
            tracing::warn!("Login fallido: usuario '{}' no encontrado", email);
            return Err(AppError::CredencialesInvalidas);
        };
        if !self.hasher.verify(&password, usuario.password_hash()).await? {
            tracing::warn!("Login fallido: contraseña incorrecta para '{}'", email);
            return Err(AppError::CredencialesInvalidas);
        }
        if !usuario.activo() {
            tracing::warn!("Login rechazado: usuario {} desactivado", usuario.id());
            return Err(AppError::AccesoDenegado);
        }

        tracing::info!("Credenciales válidas para el usuario {}", usuario.id());
        Ok(usuario.to_safe_object())
    }

    pub async fn perfil(&self, usuario_id: i64) -> AppResult<UsuarioPublico> {
        Ok(self.cargar(usuario_id).await?.to_safe_object())
    }

    pub async fn actualizar_perfil(&self, usuario_id: i64, input: ActualizarPerfilInput) -> AppResult<UsuarioPublico> {
        if input.nombre.is_none() && input.email.is_none() {
            return Err(AppError::validacion("No se proporcionaron campos para actualizar"));
        }
        let mut usuario = self.cargar(usuario_id).await?;

        if let Some(nombre) = &input.nombre {
            usuario.cambiar_nombre(nombre)?;
        }
        if let Some(email) = &input.email {
            let email = normalizar_email(email);
            if email != usuario.email() {
                if let Some(otro) = self.usuarios.buscar_por_email(&email).await? {
                    if otro.id() != usuario.id() {
                        return Err(AppError::validacion("Ya existe un usuario con ese email"));
                    }
                }
            }
            usuario.cambiar_email(&email)?;
        }

        let guardado = self.usuarios.actualizar(&usuario).await?;
        tracing::info!("Perfil del usuario {} actualizado", usuario_id);
        Ok(guardado.to_safe_object())
    }

    pub async fn listar(&self, input: ListarUsuariosInput) -> AppResult<Pagina<UsuarioPublico>> {
        let filtro = FiltroUsuarios {
            rol: input.rol.as_deref().map(str::parse::<Rol>).transpose()?,
            activo: input.activo,
        };
        let paginacion = Paginacion::new(input.pagina, input.por_pagina)?;
        let pagina = self.usuarios.listar_paginado(&filtro, paginacion).await?;
        tracing::debug!("Listados {} de {} usuarios", pagina.items.len(), pagina.total);
        Ok(pagina.map(|u| u.to_safe_object()))
    }

    pub async fn cambiar_activo(&self, usuario_id: i64, activo: bool) -> AppResult<UsuarioPublico> {
        let mut usuario = self.cargar(usuario_id).await?;
        if activo {
            usuario.activar();
        } else {
            usuario.desactivar();
        }
        let guardado = self.usuarios.actualizar(&usuario).await?;
        tracing::info!("Usuario {} {}", usuario_id, if activo { "activado" } else { "desactivado" });
        Ok(guardado.to_safe_object())
    }

    pub async fn cambiar_password(&self, usuario_id: i64, input: CambiarPasswordInput) -> AppResult<()> {
        let actual = requerido("passwordActual", input.password_actual)?;
        let nueva = requerido("passwordNueva", input.password_nueva)?;
        validar_password(&nueva)?;

        let mut usuario = self.cargar(usuario_id).await?;
        if !self.hasher.verify(&actual, usuario.password_hash()).await? {
            tracing::warn!("Cambio de contraseña rechazado para el usuario {}", usuario_id);
            return Err(AppError::CredencialesInvalidas);
        }
        usuario.cambiar_password_hash(self.hasher.hash(&nueva).await?)?;
        self.usuarios.actualizar(&usuario).await?;
        tracing::info!("Contraseña cambiada para el usuario {}", usuario_id);
        Ok(())
    }
}
