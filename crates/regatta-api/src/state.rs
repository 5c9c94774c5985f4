//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! - **Documents**: the [`DocumentGateway`], backed by Postgres or memory.
//! - **Identity**: the [`IdentityGateway`] that turns session credentials
//!   into race committee identities.
//! - **Config**: values read once from the environment at startup.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::gateway::DocumentGateway;
use crate::identity::IdentityGateway;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not `tokio::sync`)
/// because the lock is never held across `.await` points.
#[derive(Debug)]
pub struct Store<K, V> {
    data: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> Clone for Store<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Store<K, V> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.data.write().insert(key, value)
    }

    /// Retrieve a record by key.
    pub fn get(&self, key: &K) -> Option<V> {
        self.data.read().get(key).cloned()
    }

    /// Clone every record matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&V) -> bool) -> Vec<V> {
        self.data
            .read()
            .values()
            .filter(|v| predicate(v))
            .cloned()
            .collect()
    }

    /// Atomically read-validate-update a record.
    ///
    /// The closure runs under a single write lock. Returns `None` if the key
    /// is absent, otherwise the closure's result.
    pub fn try_update<R, E>(
        &self,
        key: &K,
        f: impl FnOnce(&mut V) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.data.write().get_mut(key).map(f)
    }

    /// Update the record under `key` with `update`, or insert `create()` if
    /// absent. Both paths run under one write lock; the stored value is
    /// returned.
    pub fn upsert(&self, key: K, create: impl FnOnce() -> V, update: impl FnOnce(&mut V)) -> V {
        let mut guard = self.data.write();
        match guard.get_mut(&key) {
            Some(existing) => {
                update(existing);
                existing.clone()
            }
            None => {
                let value = create();
                guard.insert(key, value.clone());
                value
            }
        }
    }

    /// Remove the record under `key` if `predicate` holds for it.
    pub fn remove_if(&self, key: &K, predicate: impl FnOnce(&V) -> bool) -> Option<V> {
        let mut guard = self.data.write();
        if guard.get(key).is_some_and(predicate) {
            guard.remove(key)
        } else {
            None
        }
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for Store<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Configuration -------------------------------------------------------------

/// Default application name shown by `/v1/config`.
pub const DEFAULT_APP_NAME: &str = "regatta.club Document Generator";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Name shown in the editor's title bar.
    pub app_name: String,
    /// Logo shown when the race committee has none.
    pub logo_url: Option<String>,
    /// Whether the session cookie carries the `Secure` flag.
    pub session_cookie_secure: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            app_name: DEFAULT_APP_NAME.to_string(),
            logo_url: None,
            session_cookie_secure: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// - `PORT` (default: 8080)
    /// - `APP_NAME` (default: [`DEFAULT_APP_NAME`])
    /// - `LOGO_URL` (default: none)
    /// - `SESSION_COOKIE_SECURE` (default: true; `false` or `0` disables)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            app_name: get("APP_NAME").unwrap_or(defaults.app_name),
            logo_url: get("LOGO_URL"),
            session_cookie_secure: get("SESSION_COOKIE_SECURE")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(defaults.session_cookie_secure),
        }
    }
}

// -- Application State ---------------------------------------------------------

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub documents: DocumentGateway,
    pub identity: IdentityGateway,
    pub config: AppConfig,
}

impl AppState {
    /// Create application state from its parts.
    pub fn new(documents: DocumentGateway, identity: IdentityGateway, config: AppConfig) -> Self {
        Self {
            documents,
            identity,
            config,
        }
    }
}
