//! Local email/password accounts gating the per-user store.
//!
//! Accounts live in the same storage backend as everything else; passwords
//! are stored as salted SHA-256 digests. The signed-in user is persisted
//! so a reload restores the session.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

use super::storage::{self, StorageError};
use super::store::{Collection, Stamped};

const USERS_KEY: &str = "fysioscreen/users";
const SESSION_KEY: &str = "fysioscreen/session";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Fel e-post eller lösenord.")]
    InvalidCredentials,
    #[error("E-postadressen används redan.")]
    EmailTaken,
    #[error("Lösenordet är för svagt (minst 6 tecken).")]
    WeakPassword,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct UserAccount {
    email: String,
    salt: String,
    digest: String,
}

/// The signed-in identity carried by the session context.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
}

fn accounts() -> Collection<UserAccount> {
    Collection::new(USERS_KEY)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

fn find_account(email: &str) -> Result<Option<Stamped<UserAccount>>, AuthError> {
    Ok(accounts()
        .list()?
        .into_iter()
        .find(|account| account.doc.email == email))
}

pub fn sign_up(email: &str, password: &str) -> Result<CurrentUser, AuthError> {
    let email = normalize_email(email);
    if password.len() < 6 {
        return Err(AuthError::WeakPassword);
    }
    if email.is_empty() {
        return Err(AuthError::InvalidCredentials);
    }
    if find_account(&email)?.is_some() {
        return Err(AuthError::EmailTaken);
    }

    let salt = uuid::Uuid::new_v4().to_string();
    let account = accounts().insert(UserAccount {
        email: email.clone(),
        digest: password_digest(&salt, password),
        salt,
    })?;

    info!(%email, "account created");
    let user = CurrentUser {
        id: account.id,
        email,
    };
    persist_session(Some(&user))?;
    Ok(user)
}

pub fn sign_in(email: &str, password: &str) -> Result<CurrentUser, AuthError> {
    let email = normalize_email(email);
    let account = find_account(&email)?.ok_or(AuthError::InvalidCredentials)?;
    if password_digest(&account.doc.salt, password) != account.doc.digest {
        return Err(AuthError::InvalidCredentials);
    }

    let user = CurrentUser {
        id: account.id,
        email,
    };
    persist_session(Some(&user))?;
    Ok(user)
}

pub fn sign_out() -> Result<(), StorageError> {
    persist_session(None)
}

fn persist_session(user: Option<&CurrentUser>) -> Result<(), StorageError> {
    match user {
        Some(user) => storage::write_key(SESSION_KEY, &serde_json::to_string(user)?),
        None => storage::remove_key(SESSION_KEY),
    }
}

/// The previously signed-in user, if any.
pub fn restore_session() -> Result<Option<CurrentUser>, StorageError> {
    match storage::read_key(SESSION_KEY)? {
        None => Ok(None),
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::isolated_test_root;

    // The account list and session key are shared state; run these
    // serially.
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    fn guard() -> std::sync::MutexGuard<'static, ()> {
        LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn unique_email() -> String {
        format!("{}@example.se", uuid::Uuid::new_v4())
    }

    #[test]
    fn sign_up_then_sign_in() {
        let _guard = guard();
        isolated_test_root();
        let email = unique_email();
        let created = sign_up(&email, "hemligt1").unwrap();
        let back = sign_in(&email, "hemligt1").unwrap();
        assert_eq!(created, back);
    }

    #[test]
    fn wrong_password_is_rejected() {
        let _guard = guard();
        isolated_test_root();
        let email = unique_email();
        sign_up(&email, "hemligt1").unwrap();
        assert!(matches!(
            sign_in(&email, "fel-lösen"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let _guard = guard();
        isolated_test_root();
        let email = unique_email();
        sign_up(&email, "hemligt1").unwrap();
        assert!(matches!(
            sign_up(&email, "hemligt2"),
            Err(AuthError::EmailTaken)
        ));
    }

    #[test]
    fn short_passwords_are_rejected() {
        let _guard = guard();
        isolated_test_root();
        assert!(matches!(
            sign_up(&unique_email(), "kort"),
            Err(AuthError::WeakPassword)
        ));
    }

    #[test]
    fn session_persists_and_clears() {
        let _guard = guard();
        isolated_test_root();
        let email = unique_email();
        let user = sign_up(&email, "hemligt1").unwrap();
        assert_eq!(restore_session().unwrap(), Some(user));
        sign_out().unwrap();
        assert_eq!(restore_session().unwrap(), None);
    }
}
