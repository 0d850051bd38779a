use jiff::Timestamp;
use oacare_core::ids::{CodeKind, compare_codes};
use oacare_core::keys;
use oacare_core::models::user::{Role, User};
use tracing::info;

use crate::error::StorageError;
use crate::sequence;
use crate::state::{create_state, load_all, load_optional, save_state};
use crate::store::ObjectStore;

const KIND: &str = "user";

/// Create an account. Usernames are unique; the object is written with
/// `If-None-Match` so two concurrent registrations cannot both succeed.
pub async fn register(
    store: &dyn ObjectStore,
    username: &str,
    password_hash: String,
    role: Role,
) -> Result<User, StorageError> {
    if find_by_username(store, username).await?.is_some() {
        return Err(username_taken(username));
    }

    let user = User {
        id: sequence::next_code(store, CodeKind::User).await?,
        username: username.to_string(),
        password_hash,
        role,
        created_at: Timestamp::now(),
    };
    match create_state(store, &keys::user(username), &user).await {
        Ok(_) => {}
        Err(StorageError::PreconditionFailed { .. }) => return Err(username_taken(username)),
        Err(e) => return Err(e),
    }

    info!(user_id = %user.id, role = %user.role, "user registered");
    Ok(user)
}

fn username_taken(username: &str) -> StorageError {
    StorageError::Conflict(format!("username {username} is already taken"))
}

pub async fn find_by_username(store: &dyn ObjectStore, username: &str) -> Result<Option<User>, StorageError> {
    load_optional(store, &keys::user(username)).await
}

/// Every account, ordered by user id.
pub async fn list(store: &dyn ObjectStore) -> Result<Vec<User>, StorageError> {
    let mut users: Vec<User> = load_all(store, keys::USERS_PREFIX).await?;
    users.sort_by(|a, b| compare_codes(&a.id, &b.id));
    Ok(users)
}

pub async fn get(store: &dyn ObjectStore, user_id: &str) -> Result<User, StorageError> {
    list(store)
        .await?
        .into_iter()
        .find(|u| u.id == user_id)
        .ok_or_else(|| StorageError::record_not_found(KIND, user_id))
}

/// Change username and role. A rename moves the object to the new key.
pub async fn update(
    store: &dyn ObjectStore,
    user_id: &str,
    username: &str,
    role: Role,
) -> Result<User, StorageError> {
    let mut user = get(store, user_id).await?;
    let previous_username = std::mem::replace(&mut user.username, username.to_string());
    user.role = role;

    if previous_username == user.username {
        save_state(store, &keys::user(&user.username), &user).await?;
    } else {
        match create_state(store, &keys::user(&user.username), &user).await {
            Ok(_) => {}
            Err(StorageError::PreconditionFailed { .. }) => return Err(username_taken(username)),
            Err(e) => return Err(e),
        }
        store.delete_object(&keys::user(&previous_username)).await?;
    }

    info!(user_id = %user.id, role = %user.role, "user updated");
    Ok(user)
}

pub async fn delete(store: &dyn ObjectStore, user_id: &str) -> Result<(), StorageError> {
    let user = get(store, user_id).await?;
    store.delete_object(&keys::user(&user.username)).await?;
    info!(user_id = %user.id, "user deleted");
    Ok(())
}
