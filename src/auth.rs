//! Login strategies.
//!
//! The strategy is chosen once from `[auth] mode` in the config file and
//! handed to the rest of the application as a `Box<dyn AuthProvider>`.
//! Both strategies persist their state in a small TOML session file that
//! plays the role of browser session storage.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::{Account, AuthMode, Config};
use crate::error::ServiceError;

/// Pseudo uid shared by every legacy UI login
pub const LEGACY_UID: &str = "ui";

/// Built-in development accounts for the legacy mode
const LEGACY_ACCOUNTS: &[(&str, &str)] = &[
    ("tutor@example.com", "tutor123"),
    ("demo@example.com", "demo123"),
];

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("E-Mail oder Passwort ist falsch.")]
    InvalidCredentials,
    #[error("Failed to read session file: {0}")]
    ReadError(String),
    #[error("Failed to write session file: {0}")]
    WriteError(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub uid: String,
    pub email: String,
}

impl User {
    /// Name shown in greetings: the part of the email before '@'
    pub fn display_name(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

/// Uniform login surface used by the CLI and the TUI
pub trait AuthProvider {
    fn mode(&self) -> AuthMode;
    fn login(&self, email: &str, password: &str) -> Result<User, AuthError>;
    fn logout(&self) -> Result<(), AuthError>;
    /// The user known right now, without touching the session file
    fn current_user(&self) -> Option<User>;
    /// Re-read the persisted session, then report the user
    fn wait_for_user(&self) -> Result<Option<User>, AuthError>;
}

/// Persisted login flags, stored under the same keys the web client used
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(rename = "uiLoggedIn", default)]
    pub logged_in: String,
    #[serde(rename = "uiUser", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

/// Session storage: a TOML file, or memory only
pub struct SessionStore {
    path: Option<PathBuf>,
    state: RefCell<SessionState>,
}

impl SessionStore {
    /// Open the session file, starting logged out when it does not exist
    pub fn open(path: PathBuf) -> Result<Self, AuthError> {
        let store = Self {
            path: Some(path),
            state: RefCell::new(SessionState::default()),
        };
        store.reload()?;
        Ok(store)
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: RefCell::new(SessionState::default()),
        }
    }

    /// Refresh the in-memory state from disk
    pub fn reload(&self) -> Result<(), AuthError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let state = if path.exists() {
            let contents = fs::read_to_string(path)
                .map_err(|e| AuthError::ReadError(e.to_string()))?;
            toml::from_str(&contents).map_err(|e| AuthError::ReadError(e.to_string()))?
        } else {
            SessionState::default()
        };
        *self.state.borrow_mut() = state;
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().logged_in == "1"
    }

    pub fn user_label(&self) -> String {
        self.state.borrow().user.clone().unwrap_or_default()
    }

    pub fn uid(&self) -> Option<String> {
        self.state.borrow().uid.clone()
    }

    /// Store the login flag; logging out drops the label and uid
    pub fn set_logged_in(&self, flag: bool, user_label: &str, uid: Option<&str>) -> Result<(), AuthError> {
        let state = if flag {
            SessionState {
                logged_in: "1".to_string(),
                user: Some(user_label.to_string()),
                uid: uid.map(str::to_string),
            }
        } else {
            SessionState {
                logged_in: "0".to_string(),
                user: None,
                uid: None,
            }
        };
        self.persist(&state)?;
        *self.state.borrow_mut() = state;
        Ok(())
    }

    fn persist(&self, state: &SessionState) -> Result<(), AuthError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| AuthError::WriteError(e.to_string()))?;
        }
        let contents = toml::to_string(state).map_err(|e| AuthError::WriteError(e.to_string()))?;
        fs::write(path, contents).map_err(|e| AuthError::WriteError(e.to_string()))
    }
}

/// UI-only login against fixed demo accounts. Not a security feature.
pub struct LegacyAuth {
    session: SessionStore,
}

impl LegacyAuth {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }
}

impl AuthProvider for LegacyAuth {
    fn mode(&self) -> AuthMode {
        AuthMode::Legacy
    }

    fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim();
        let ok = LEGACY_ACCOUNTS
            .iter()
            .any(|(e, p)| *e == email && *p == password);
        if !ok {
            return Err(AuthError::InvalidCredentials);
        }
        self.session.set_logged_in(true, email, None)?;
        tracing::info!(email, "legacy login");
        Ok(User { uid: LEGACY_UID.to_string(), email: email.to_string() })
    }

    fn logout(&self) -> Result<(), AuthError> {
        self.session.set_logged_in(false, "", None)
    }

    fn current_user(&self) -> Option<User> {
        if !self.session.is_logged_in() {
            return None;
        }
        Some(User { uid: LEGACY_UID.to_string(), email: self.session.user_label() })
    }

    fn wait_for_user(&self) -> Result<Option<User>, AuthError> {
        self.session.reload()?;
        Ok(self.current_user())
    }
}

/// Accounts from the config file, each owning its own data namespace
pub struct AccountAuth {
    session: SessionStore,
    accounts: Vec<Account>,
}

impl AccountAuth {
    pub fn new(session: SessionStore, accounts: Vec<Account>) -> Self {
        Self { session, accounts }
    }

    /// Hex SHA-256 of a password, the format stored in `password_sha256`
    pub fn hash_password(password: &str) -> String {
        hex::encode(Sha256::digest(password.as_bytes()))
    }

    fn account_by_uid(&self, uid: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.uid == uid)
    }
}

impl AuthProvider for AccountAuth {
    fn mode(&self) -> AuthMode {
        AuthMode::Accounts
    }

    fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim();
        let hash = Self::hash_password(password);
        let account = self
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email) && a.password_sha256.eq_ignore_ascii_case(&hash))
            .ok_or(AuthError::InvalidCredentials)?;

        self.session.set_logged_in(true, &account.email, Some(&account.uid))?;
        tracing::info!(uid = %account.uid, "account login");
        Ok(User { uid: account.uid.clone(), email: account.email.clone() })
    }

    fn logout(&self) -> Result<(), AuthError> {
        self.session.set_logged_in(false, "", None)
    }

    fn current_user(&self) -> Option<User> {
        if !self.session.is_logged_in() {
            return None;
        }
        // A session for an account removed from the config no longer counts
        let uid = self.session.uid()?;
        let account = self.account_by_uid(&uid)?;
        Some(User { uid: account.uid.clone(), email: account.email.clone() })
    }

    fn wait_for_user(&self) -> Result<Option<User>, AuthError> {
        self.session.reload()?;
        Ok(self.current_user())
    }
}

/// Build the configured strategy over the given session store
pub fn provider_for(config: &Config, session: SessionStore) -> Box<dyn AuthProvider> {
    match config.auth.mode {
        AuthMode::Legacy => Box::new(LegacyAuth::new(session)),
        AuthMode::Accounts => Box::new(AccountAuth::new(session, config.auth.accounts.clone())),
    }
}

/// Build the configured strategy over the profile's session file
pub fn from_config(config: &Config) -> Result<Box<dyn AuthProvider>, AuthError> {
    let session = SessionStore::open(config.get_session_path())?;
    Ok(provider_for(config, session))
}

/// The logged-in user's uid, or `NotLoggedIn`
pub fn require_uid(auth: &dyn AuthProvider) -> Result<String, ServiceError> {
    let user = match auth.current_user() {
        Some(user) => Some(user),
        None => auth.wait_for_user()?,
    };
    user.map(|u| u.uid).ok_or(ServiceError::NotLoggedIn)
}
