// services/accounts.rs

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::Error;
use crate::models::identity::{Identity, Role};
use crate::models::image::Upload;
use crate::repository::IdentityStore;
use crate::services::password::{hash_password, verify_password};
use crate::services::upload_reconciler;

/// Validated registration form.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub display_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: String,
    pub role: Role,
}

pub async fn register(
    identities: &dyn IdentityStore,
    account: NewAccount,
    upload: Option<Upload>,
) -> Result<Identity, Error> {
    let password_hash = hash_password(&account.password)?;
    let mut identity = Identity::new(account.email, account.display_name, account.role, password_hash);
    identity.first_name = account.first_name;
    identity.last_name = account.last_name;
    identity.image = upload.map(upload_reconciler::encode);

    identities.insert(&identity).await.map_err(|e| match Error::from(e) {
        Error::Duplicate { .. } => Error::Duplicate {
            message: format!("An account for {} already exists", identity.email),
        },
        other => other,
    })?;
    info!(id = %identity.id, role = identity.role.as_str(), "registered account");
    Ok(identity)
}

/// `None` for an unknown email or a wrong password.
pub async fn authenticate(identities: &dyn IdentityStore, email: &str, password: &str) -> Result<Option<Identity>, Error> {
    let Some(identity) = identities.find_by_email(email).await? else {
        return Ok(None);
    };
    if verify_password(password, &identity.password_hash) {
        Ok(Some(identity))
    } else {
        warn!(id = %identity.id, "wrong password");
        Ok(None)
    }
}

/// Creates the configured admin when no admin account exists yet.
pub async fn ensure_admin(identities: &dyn IdentityStore, config: &AppConfig) -> Result<Option<Identity>, Error> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(None);
    };
    if !identities.list_by_role(Role::Admin).await?.is_empty() {
        return Ok(None);
    }

    let account = NewAccount {
        email: email.clone(),
        display_name: "Administrator".to_string(),
        first_name: None,
        last_name: None,
        password: password.clone(),
        role: Role::Admin,
    };
    register(identities, account, None).await.map(Some)
}
