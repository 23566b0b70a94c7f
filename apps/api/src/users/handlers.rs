use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::identity::{CurrentIdentity, IdentityId};
use crate::models::user::{User, UserIdentity};
use crate::state::AppState;
use crate::store::{CareerStore, StoreError};

#[derive(Debug, Deserialize)]
pub struct SyncUserRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Mirrors the identity provider's view of the caller into `users`.
/// Profile fields and the industry link are never touched here.
pub async fn sync_user(
    store: &dyn CareerStore,
    identity: Option<&IdentityId>,
    req: SyncUserRequest,
) -> Result<User, AppError> {
    let identity = identity.ok_or(AppError::Unauthorized)?;
    let email = req.email.trim().to_string();
    if email.is_empty() {
        return Err(AppError::Validation("email is required".to_string()));
    }
    let name = req
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let user = store
        .upsert_user_identity(identity.as_str(), &UserIdentity { email, name })
        .await
        .map_err(|e| match e {
            StoreError::EmailTaken(_) => {
                AppError::Validation("email is already linked to another account".to_string())
            }
            other => AppError::Store(other),
        })?;
    info!(user_id = %user.id, %identity, "User synced from identity provider");
    Ok(user)
}

/// POST /api/v1/users/sync
pub async fn handle_sync_user(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    payload: Result<Json<SyncUserRequest>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let Json(req) = payload?;
    let user = sync_user(state.store.as_ref(), identity.as_ref(), req).await?;
    Ok(Json(user))
}
