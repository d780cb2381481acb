//! Startup seeding.
//!
//! Every user-creating route needs an `asistente` token, so a fresh store
//! gets the three fixed roles and, when configured, one assistant account.
//! Records that already exist are left untouched.

use anyhow::Result;

use crate::app::AppState;
use crate::auth::{hash_password, Role};
use crate::config::{BootstrapAssistant, BootstrapConfig};
use crate::filter::FilterData;
use crate::models::{Asistente, Rol, Timestamps, Usuario};

/// Fixed role ids; clients refer to roles by these numbers.
pub const ROLES: [(i64, Role); 3] = [(1, Role::Abogado), (2, Role::Asistente), (3, Role::Cliente)];

pub async fn seed(state: &AppState, config: &BootstrapConfig) -> Result<()> {
    if config.seed_roles {
        seed_roles(state).await?;
    }
    if let Some(assistant) = &config.assistant {
        seed_assistant(state, assistant).await?;
    }
    Ok(())
}

pub async fn seed_roles(state: &AppState) -> Result<()> {
    let repo = state.repo::<Rol>();
    for (id_rol, nombre) in ROLES {
        if repo.exists(FilterData::eq("id_rol", id_rol)).await? {
            continue;
        }
        repo.insert(&Rol { id_rol, nombre }).await?;
        tracing::info!("Seeded role {} ({})", id_rol, nombre.as_str());
    }
    Ok(())
}

async fn seed_assistant(state: &AppState, assistant: &BootstrapAssistant) -> Result<()> {
    let (id_rol, _) = ROLES[1];
    let usuarios = state.repo::<Usuario>();
    let by_id = || FilterData::eq("numeroIdentificacion", assistant.numero_identificacion.as_str());

    if !usuarios.exists(by_id()).await? {
        let password = hash_password(&assistant.password, state.security.bcrypt_cost)?;
        usuarios
            .insert(&Usuario {
                numero_identificacion: assistant.numero_identificacion.clone(),
                nombres: "Asistente".to_string(),
                apellidos: "Inicial".to_string(),
                telefono: "0000000000".to_string(),
                email: assistant.email.clone(),
                password,
                id_rol,
                timestamps: Timestamps::default(),
            })
            .await?;
        tracing::info!("Seeded assistant user {}", assistant.email);
    }

    let asistentes = state.repo::<Asistente>();
    if !asistentes.exists(by_id()).await? {
        asistentes
            .insert(&Asistente {
                numero_identificacion: assistant.numero_identificacion.clone(),
                timestamps: Timestamps::default(),
            })
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::SecurityConfig;
    use crate::database::MemoryStore;

    fn state() -> AppState {
        AppState::new(
            Arc::new(MemoryStore::new()),
            SecurityConfig {
                jwt_secret: "test".to_string(),
                jwt_expiry_hours: 1,
                bcrypt_cost: 4,
                enable_cors: false,
                cors_origins: vec![],
            },
        )
    }

    #[tokio::test]
    async fn seeding_twice_leaves_one_copy_of_everything() {
        let state = state();
        let config = BootstrapConfig {
            seed_roles: true,
            assistant: Some(BootstrapAssistant {
                numero_identificacion: "1000001".to_string(),
                email: "admin@bufete.co".to_string(),
                password: "secreto1".to_string(),
            }),
        };

        seed(&state, &config).await.unwrap();
        seed(&state, &config).await.unwrap();

        assert_eq!(state.repo::<Rol>().select_any(FilterData::all()).await.unwrap().len(), 3);
        let usuarios = state.repo::<Usuario>().select_any(FilterData::all()).await.unwrap();
        assert_eq!(usuarios.len(), 1);
        assert_eq!(usuarios[0].id_rol, 2);
        assert_ne!(usuarios[0].password, "secreto1");
        assert_eq!(state.repo::<Asistente>().select_any(FilterData::all()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn nothing_is_seeded_when_disabled() {
        let state = state();
        seed(&state, &BootstrapConfig::default()).await.unwrap();
        assert!(state.repo::<Rol>().select_any(FilterData::all()).await.unwrap().is_empty());
    }
}
