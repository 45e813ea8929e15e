//! Dispatchers shared across threads.
//!
//! Two policies are offered:
//! - [`SharedDispatcher`] guards the registry with a read-write lock, so
//!   registration may interleave with resolution.
//! - [`FrozenDispatcher`] is an immutable snapshot taken once registration
//!   is over; resolving from it takes no lock at all.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::hierarchy::Hierarchy;

use super::registry::Registry;
use super::result::DispatchError;
use super::types::Signature;

/// A cloneable handle to one registry behind a read-write lock.
pub struct SharedDispatcher<Hy: Hierarchy, H> {
    hierarchy: Arc<Hy>,
    registry: Arc<RwLock<Registry<Hy::Ty, H>>>,
}

impl<Hy: Hierarchy, H> Clone for SharedDispatcher<Hy, H> {
    fn clone(&self) -> Self {
        Self {
            hierarchy: Arc::clone(&self.hierarchy),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<Hy: Hierarchy, H> SharedDispatcher<Hy, H> {
    pub fn new(hierarchy: Hy) -> Self {
        Self::from_parts(Arc::new(hierarchy), Registry::new())
    }

    pub(crate) fn from_parts(hierarchy: Arc<Hy>, registry: Registry<Hy::Ty, H>) -> Self {
        Self {
            hierarchy,
            registry: Arc::new(RwLock::new(registry)),
        }
    }

    /// Bind `signature` to `handle` under the write lock.
    pub fn register(&self, signature: impl Into<Signature<Hy::Ty>>, handle: H) -> Option<H> {
        let signature = signature.into();
        debug!(%signature, "registering method (shared)");
        self.registry.write().register(signature, handle)
    }

    /// Resolve under a read lock, returning a clone of the bound handle.
    pub fn resolve(&self, call: &[Hy::Ty]) -> Result<H, DispatchError<Hy::Ty>>
    where
        H: Clone,
    {
        let registry = self.registry.read();
        registry.resolve(&*self.hierarchy, call).cloned()
    }

    pub fn hierarchy(&self) -> &Hy {
        &self.hierarchy
    }

    pub fn len(&self) -> usize {
        self.registry.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.read().is_empty()
    }

    /// Snapshot the current bindings. Later registrations through this
    /// handle are not visible to the snapshot.
    pub fn freeze(&self) -> FrozenDispatcher<Hy, H>
    where
        H: Clone,
    {
        let snapshot = self.registry.read().clone();
        FrozenDispatcher::new(Arc::clone(&self.hierarchy), Arc::new(snapshot))
    }
}

/// An immutable, cheaply cloneable dispatcher.
pub struct FrozenDispatcher<Hy: Hierarchy, H> {
    hierarchy: Arc<Hy>,
    registry: Arc<Registry<Hy::Ty, H>>,
}

impl<Hy: Hierarchy, H> Clone for FrozenDispatcher<Hy, H> {
    fn clone(&self) -> Self {
        Self {
            hierarchy: Arc::clone(&self.hierarchy),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<Hy: Hierarchy, H> FrozenDispatcher<Hy, H> {
    pub(crate) fn new(hierarchy: Arc<Hy>, registry: Arc<Registry<Hy::Ty, H>>) -> Self {
        debug!(methods = registry.len(), "froze dispatcher");
        Self {
            hierarchy,
            registry,
        }
    }

    pub fn resolve(&self, call: &[Hy::Ty]) -> Result<&H, DispatchError<Hy::Ty>> {
        self.registry.resolve(&*self.hierarchy, call)
    }

    pub fn hierarchy(&self) -> &Hy {
        &self.hierarchy
    }

    pub fn registry(&self) -> &Registry<Hy::Ty, H> {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}
