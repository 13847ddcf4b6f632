//! Host session store abstraction.
//!
//! The facade never owns session data. Whatever carries the session across
//! requests (a web framework's session layer, a test fixture, the in-memory
//! store below) implements [`SessionStore`] and is lent to the facade for the
//! duration of one request.

use {
    serde_json::{Map, Value},
    tracing::debug,
    ws_session_config::schema::StoreConfig,
};

/// Lifecycle state reported by a session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Sessions are unavailable on this host.
    Disabled,
    /// Sessions are available but none has been started yet.
    None,
    /// A session is started for this request.
    Active,
}

/// Per-visitor session storage provided by the host.
pub trait SessionStore {
    fn status(&self) -> SessionStatus;

    /// Begin (or resume) the visitor's session.
    fn start(&mut self) -> anyhow::Result<()>;

    /// Tear the session down, discarding persisted values.
    fn destroy(&mut self) -> anyhow::Result<()>;

    /// Live session values for the current request.
    fn values(&self) -> &Map<String, Value>;

    fn values_mut(&mut self) -> &mut Map<String, Value>;
}

impl<S: SessionStore + ?Sized> SessionStore for &mut S {
    fn status(&self) -> SessionStatus {
        (**self).status()
    }

    fn start(&mut self) -> anyhow::Result<()> {
        (**self).start()
    }

    fn destroy(&mut self) -> anyhow::Result<()> {
        (**self).destroy()
    }

    fn values(&self) -> &Map<String, Value> {
        (**self).values()
    }

    fn values_mut(&mut self) -> &mut Map<String, Value> {
        (**self).values_mut()
    }
}

/// Process-local store for a single visitor.
///
/// Values survive [`MemoryStore::close`] so a later `start()` resumes them,
/// the way a persisted session resumes on the next request.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    status: SessionStatus,
    values: Map<String, Value>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::None,
            values: Map::new(),
        }
    }

    /// Create a store whose session already holds `values` (not yet started).
    pub fn with_values(values: Map<String, Value>) -> Self {
        Self {
            status: SessionStatus::None,
            values,
        }
    }

    /// Create a store on a host with sessions turned off.
    pub fn disabled() -> Self {
        Self {
            status: SessionStatus::Disabled,
            values: Map::new(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        if !config.enabled {
            debug!("session store disabled by config");
            return Self::disabled();
        }
        let values: Map<String, Value> = config
            .seed
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        debug!(seeded = values.len(), "memory session store created");
        Self::with_values(values)
    }

    /// End the current request, keeping values for the next `start()`.
    pub fn close(&mut self) {
        if self.status == SessionStatus::Active {
            self.status = SessionStatus::None;
            debug!(keys = self.values.len(), "session closed");
        }
    }
}

impl SessionStore for MemoryStore {
    fn status(&self) -> SessionStatus {
        self.status
    }

    fn start(&mut self) -> anyhow::Result<()> {
        match self.status {
            SessionStatus::Disabled => anyhow::bail!("sessions are disabled"),
            SessionStatus::None => {
                self.status = SessionStatus::Active;
                debug!(keys = self.values.len(), "session started");
            },
            SessionStatus::Active => {},
        }
        Ok(())
    }

    fn destroy(&mut self) -> anyhow::Result<()> {
        if self.status == SessionStatus::Active {
            self.values.clear();
            self.status = SessionStatus::None;
            debug!("session destroyed");
        }
        Ok(())
    }

    fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    fn values_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.values
    }
}
