use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::info;

use super::EmbeddingIndex;

/// Shared slot holding the index queries run against.
///
/// Readers take a cheap [`Arc`] snapshot and never observe a partial build:
/// a replacement is built off to the side under the rebuild lock and swapped
/// in only once complete.
#[derive(Debug, Clone, Default)]
pub struct IndexHandle {
    current: Arc<RwLock<Option<Arc<EmbeddingIndex>>>>,
    rebuild: Arc<Mutex<()>>,
}

impl IndexHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current index, or `None` before the first successful build.
    pub fn snapshot(&self) -> Option<Arc<EmbeddingIndex>> {
        self.current.read().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.current.read().is_some()
    }

    /// Installs `index`, returning the one it replaced.
    pub fn install(&self, index: EmbeddingIndex) -> Option<Arc<EmbeddingIndex>> {
        let index = Arc::new(index);
        info!(
            chunks = index.len(),
            fingerprint = %index.stats().fingerprint,
            "Index installed"
        );
        self.current.write().replace(index)
    }

    /// Runs `build` with rebuilds serialised, installing its output on success.
    ///
    /// On error the previously installed index stays in place.
    pub fn rebuild<E, F>(&self, build: F) -> Result<Arc<EmbeddingIndex>, E>
    where
        F: FnOnce() -> Result<EmbeddingIndex, E>,
    {
        let _guard = self.rebuild.lock();
        let index = Arc::new(build()?);
        *self.current.write() = Some(Arc::clone(&index));
        info!(
            chunks = index.len(),
            fingerprint = %index.stats().fingerprint,
            "Index rebuilt and swapped in"
        );
        Ok(index)
    }
}
