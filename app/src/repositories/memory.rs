//! In-memory user store for tests and ephemeral runs

use async_trait::async_trait;
use companionfit_core::User;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use super::{StoreError, UserStore};

/// [`UserStore`] that keeps the user in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    user: RwLock<Option<User>>,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a user already persisted
    pub fn with_user(user: User) -> Self {
        Self {
            user: RwLock::new(Some(user)),
            ..Self::default()
        }
    }

    /// Make subsequent `save`/`clear` calls fail with an I/O error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Copy of the currently stored user
    pub async fn snapshot(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io("memory store is read-only".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn load(&self) -> Result<Option<User>, StoreError> {
        Ok(self.user.read().await.clone())
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        self.check_writable()?;
        *self.user.write().await = Some(user.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.check_writable()?;
        *self.user.write().await = None;
        Ok(())
    }
}
