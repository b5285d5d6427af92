//! Replaceable handle to the live form.
//!
//! Hosts rebuild the form when settings change. Callers take an `Arc` to the
//! current form and drop the lock before awaiting anything, so a rebuild never
//! waits on a submission and commands never queue behind a rebuild. A
//! submission that is in flight during a rebuild settles on the form it
//! started with.

use std::sync::Arc;

use tokio::sync::RwLock;

pub struct FormSlot<F> {
    current: RwLock<Arc<F>>,
}

impl<F> FormSlot<F> {
    pub fn new(form: F) -> Self {
        Self {
            current: RwLock::new(Arc::new(form)),
        }
    }

    /// The live form. The slot's lock is released before this returns.
    pub async fn current(&self) -> Arc<F> {
        self.current.read().await.clone()
    }

    /// Installs `form` and returns the one it replaced.
    pub async fn replace(&self, form: F) -> Arc<F> {
        let mut current = self.current.write().await;
        std::mem::replace(&mut *current, Arc::new(form))
    }
}
