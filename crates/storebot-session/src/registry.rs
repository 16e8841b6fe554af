use crate::session::Session;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Shared handle to one session.
///
/// The async mutex serializes conversation turns: whoever is advancing the
/// session holds the lock until the turn completes, so the transcript is only
/// ever read and appended by one caller at a time.
pub type SessionHandle = Arc<tokio::sync::Mutex<Session>>;

struct RegistryInner {
    sessions: HashMap<String, SessionHandle>,
    /// Thread ids from least to most recently used.
    order: Vec<String>,
}

impl RegistryInner {
    fn touch(&mut self, thread_id: &str) {
        if let Some(pos) = self.order.iter().position(|t| t == thread_id) {
            let id = self.order.remove(pos);
            self.order.push(id);
        }
    }
}

/// In-memory session registry keyed by thread id, bounded by an LRU policy.
///
/// Sessions are created on first lookup. When the registry is at capacity,
/// inserting a new thread id evicts the least recently used session; an
/// evicted thread id starts over with a fresh transcript on its next message.
pub struct SessionRegistry {
    inner: Mutex<RegistryInner>,
    capacity: usize,
}

impl SessionRegistry {
    /// Creates a registry holding at most `capacity` sessions. A capacity of
    /// zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                sessions: HashMap::new(),
                order: Vec::new(),
            }),
            capacity: capacity.max(1),
        }
    }

    /// Returns the session for `thread_id`, creating it if absent.
    pub fn get_or_create(&self, thread_id: &str) -> SessionHandle {
        let mut inner = self.inner.lock();

        if let Some(handle) = inner.sessions.get(thread_id).map(Arc::clone) {
            inner.touch(thread_id);
            return handle;
        }

        if inner.sessions.len() >= self.capacity {
            // order[0] is the least recently used entry.
            let evicted = inner.order.remove(0);
            inner.sessions.remove(&evicted);
            info!(thread_id = %evicted, "Evicted least recently used session");
        }

        debug!(thread_id = %thread_id, "Created session");
        let handle: SessionHandle = Arc::new(tokio::sync::Mutex::new(Session::new(thread_id)));
        inner.sessions.insert(thread_id.to_string(), Arc::clone(&handle));
        inner.order.push(thread_id.to_string());
        handle
    }

    /// Returns the session for `thread_id` without creating one.
    pub fn get(&self, thread_id: &str) -> Option<SessionHandle> {
        let mut inner = self.inner.lock();
        let handle = inner.sessions.get(thread_id).map(Arc::clone)?;
        inner.touch(thread_id);
        Some(handle)
    }

    /// Removes the session for `thread_id`, if present.
    pub fn remove(&self, thread_id: &str) {
        let mut inner = self.inner.lock();
        inner.sessions.remove(thread_id);
        if let Some(pos) = inner.order.iter().position(|t| t == thread_id) {
            inner.order.remove(pos);
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.inner.lock().sessions.len()
    }

    /// Whether the registry holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
