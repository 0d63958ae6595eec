use crate::domain::ports::KeyValueStoreBox;
use crate::error::{JournalError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const PASSWORD_KEY: &str = "sa_pass";
pub const THEME_KEY: &str = "sa_theme";

pub const DEFAULT_PASSWORD: &str = "star7777";
/// Earlier default password; a journal still using it is moved to the current default.
pub const LEGACY_DEFAULT_PASSWORD: &str = "star123";
pub const DEFAULT_THEME: &str = "#7c5cff";

/// Shared password and theme color.
pub struct SettingsStore {
    store: KeyValueStoreBox,
}

impl SettingsStore {
    pub fn new(store: KeyValueStoreBox) -> Self {
        Self { store }
    }

    /// Startup migration: an unset password or the legacy default becomes
    /// [`DEFAULT_PASSWORD`]. Returns whether anything was written.
    pub async fn migrate_password(&self) -> Result<bool> {
        let stored: Option<String> = self.read(PASSWORD_KEY).await?;
        match stored.as_deref() {
            None | Some(LEGACY_DEFAULT_PASSWORD) => {
                self.write(PASSWORD_KEY, &DEFAULT_PASSWORD).await?;
                tracing::info!("password reset to the current default");
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }

    pub async fn password(&self) -> Result<String> {
        Ok(self
            .read(PASSWORD_KEY)
            .await?
            .unwrap_or_else(|| DEFAULT_PASSWORD.to_string()))
    }

    /// Stores a new password. Surrounding whitespace is dropped; an empty
    /// password is rejected.
    pub async fn set_password(&self, password: &str) -> Result<()> {
        let password = password.trim();
        if password.is_empty() {
            return Err(JournalError::ValidationError(
                "Password must not be empty".to_string(),
            ));
        }
        self.write(PASSWORD_KEY, &password).await?;
        tracing::info!("password updated");
        Ok(())
    }

    pub async fn theme(&self) -> Result<String> {
        Ok(self
            .read(THEME_KEY)
            .await?
            .unwrap_or_else(|| DEFAULT_THEME.to_string()))
    }

    pub async fn set_theme(&self, color: &str) -> Result<()> {
        let color = color.trim();
        if color.is_empty() {
            return Err(JournalError::ValidationError(
                "Theme color must not be empty".to_string(),
            ));
        }
        self.write(THEME_KEY, &color).await?;
        tracing::debug!(color, "theme updated");
        Ok(())
    }

    // Unreadable values fall back to the caller's default, like a missing key.
    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(bytes) = self.store.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring corrupt setting");
                Ok(None)
            }
        }
    }

    async fn write<T: Serialize + ?Sized + Sync>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.store.put(key, bytes).await
    }
}

/// Whether the current session has passed the password gate. Never persisted.
#[derive(Debug, Default)]
pub struct Session {
    authenticated: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Compares `input` (trimmed) against the stored password.
    pub async fn login(&mut self, settings: &SettingsStore, input: &str) -> Result<()> {
        let input = input.trim();
        if input.is_empty() {
            return Err(JournalError::ValidationError(
                "Password is required".to_string(),
            ));
        }
        if input == settings.password().await? {
            self.authenticated = true;
            Ok(())
        } else {
            self.authenticated = false;
            tracing::warn!("rejected login attempt");
            Err(JournalError::Unauthorized)
        }
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
    }
}
