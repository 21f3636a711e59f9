//! A layer registry shared between threads.
//!
//! Declarations take the write lock so order assignment stays sequential;
//! lookups and resolution take the read lock.

use std::sync::{Arc, PoisonError, RwLock};

use crate::declaration::Declaration;
use crate::error::CascadeError;
use crate::layer::{LayerName, LayerRank, LayerRef, LayerRegistry};
use crate::resolver::{CascadeResolver, ResolverOptions};

/// Cloneable handle to one registry behind a single-writer, many-reader lock.
///
/// The registry is append-only, so a writer that panicked mid-call cannot
/// leave it half-ordered; poisoned locks are recovered rather than surfaced.
#[derive(Clone, Debug, Default)]
pub struct SharedLayerRegistry {
    inner: Arc<RwLock<LayerRegistry>>,
}

impl SharedLayerRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn from_registry(registry: LayerRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn declare(&self, name: &LayerName) -> LayerRef {
        self.with_write(|registry| registry.declare(name))
    }

    /// # Errors
    /// Returns `CascadeError::InvalidLayerName` when `qualified` does not parse.
    pub fn declare_qualified(&self, qualified: &str) -> Result<LayerRef, CascadeError> {
        self.with_write(|registry| registry.declare_qualified(qualified))
    }

    pub fn declare_nested(&self, parent: Option<&LayerName>, relative: &LayerName) -> LayerRef {
        self.with_write(|registry| registry.declare_nested(parent, relative))
    }

    pub fn declare_anonymous(&self, parent: Option<&LayerName>) -> LayerRef {
        self.with_write(|registry| registry.declare_anonymous(parent))
    }

    pub fn order_of(&self, name: &LayerName) -> LayerRank {
        self.with_read(|registry| registry.order_of(name))
    }

    /// Copy of the registry as it stands now.
    pub fn snapshot(&self) -> LayerRegistry {
        self.with_read(Clone::clone)
    }

    /// Resolve `candidates` while holding the read lock.
    ///
    /// # Errors
    /// Propagates validation failures from [`CascadeResolver::resolve`].
    pub fn resolve_value(
        &self,
        candidates: &[Declaration],
        options: ResolverOptions,
    ) -> Result<Option<Declaration>, CascadeError> {
        self.with_read(|registry| {
            CascadeResolver::with_options(registry, options)
                .resolve(candidates)
                .map(|result| result.winner().cloned())
        })
    }

    pub fn with_read<T>(&self, read: impl FnOnce(&LayerRegistry) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        read(&guard)
    }

    fn with_write<T>(&self, write: impl FnOnce(&mut LayerRegistry) -> T) -> T {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        write(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn readers_see_a_finished_registry() {
        let shared = SharedLayerRegistry::new();
        let reset = shared
            .declare_qualified("reset")
            .unwrap_or_else(|err| panic!("{err}"));
        let theme = shared
            .declare_qualified("theme")
            .unwrap_or_else(|err| panic!("{err}"));

        let handles: Vec<_> = (0..4_u32)
            .map(|worker| {
                let registry = shared.clone();
                let candidates = vec![
                    Declaration::new("color", "grey", worker).with_layer(reset.clone()),
                    Declaration::new("color", "lime", worker + 1).with_layer(theme.clone()),
                ];
                thread::spawn(move || {
                    registry
                        .resolve_value(&candidates, ResolverOptions::default())
                        .ok()
                        .flatten()
                        .map(|winner| winner.value().to_owned())
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().ok().flatten().as_deref(), Some("lime"));
        }
    }

    #[test]
    fn concurrent_redeclaration_keeps_one_index() {
        let shared = SharedLayerRegistry::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = shared.clone();
                thread::spawn(move || registry.declare_qualified("base").map(|layer| layer.order))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().ok(), Some(Ok(0)));
        }
        assert_eq!(shared.snapshot().len(), 1);
    }
}
