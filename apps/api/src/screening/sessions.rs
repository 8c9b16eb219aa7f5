use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::models::session::Session;

/// Process-local registry of active conversations.
///
/// Each session sits behind its own mutex, so a conversation's turns run one at
/// a time while different conversations proceed independently.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, session: Session) {
        self.sessions
            .write()
            .await
            .insert(session.id, Arc::new(Mutex::new(session)));
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Removes the session. Returns false when it did not exist.
    pub async fn destroy(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let registry = SessionRegistry::new();
        let session = Session::new();
        let id = session.id;
        registry.create(session).await;

        let handle = registry.get(id).await.unwrap();
        assert_eq!(handle.lock().await.id, id);
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_destroy() {
        let registry = SessionRegistry::new();
        let session = Session::new();
        let id = session.id;
        registry.create(session).await;

        assert!(registry.destroy(id).await);
        assert!(!registry.destroy(id).await);
        assert!(registry.get(id).await.is_none());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = SessionRegistry::new();
        let (a, b) = (Session::new(), Session::new());
        let (a_id, b_id) = (a.id, b.id);
        registry.create(a).await;
        registry.create(b).await;

        let a = registry.get(a_id).await.unwrap();
        let b = registry.get(b_id).await.unwrap();
        a.lock().await.push_user("hello from a");
        assert!(b.lock().await.messages().is_empty());
    }
}
