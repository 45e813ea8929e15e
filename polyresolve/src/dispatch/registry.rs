//! Signature registries and the owning dispatcher.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tracing::debug;

use crate::hierarchy::Hierarchy;

use super::resolver::DispatchResolver;
use super::result::DispatchError;
use super::shared::{FrozenDispatcher, SharedDispatcher};
use super::types::Signature;

type Bucket<T, H> = IndexMap<Signature<T>, H, FxBuildHasher>;

/// Signature to implementation bindings.
///
/// Signatures are bucketed by arity. Within a bucket, iteration follows
/// first registration; overwriting a binding keeps its position.
#[derive(Debug, Clone)]
pub struct Registry<T, H> {
    buckets: BTreeMap<usize, Bucket<T, H>>,
    len: usize,
}

impl<T, H> Default for Registry<T, H> {
    fn default() -> Self {
        Self {
            buckets: BTreeMap::new(),
            len: 0,
        }
    }
}

impl<T: Eq + Hash, H> Registry<T, H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `signature` to `handle`, returning the handle it replaces.
    pub fn register(&mut self, signature: Signature<T>, handle: H) -> Option<H> {
        let previous = self
            .buckets
            .entry(signature.arity())
            .or_default()
            .insert(signature, handle);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// The handle bound to exactly this signature.
    pub fn get(&self, signature: &Signature<T>) -> Option<&H> {
        self.buckets.get(&signature.arity())?.get(signature)
    }

    pub fn contains(&self, signature: &Signature<T>) -> bool {
        self.get(signature).is_some()
    }

    /// Bindings whose signatures have `arity` positions.
    pub fn bucket(&self, arity: usize) -> impl Iterator<Item = (&Signature<T>, &H)> + '_ {
        self.buckets.get(&arity).into_iter().flat_map(|b| b.iter())
    }

    /// All bindings, by ascending arity then registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Signature<T>, &H)> + '_ {
        self.buckets.values().flat_map(|b| b.iter())
    }

    pub fn signatures(&self) -> impl Iterator<Item = &Signature<T>> + '_ {
        self.iter().map(|(sig, _)| sig)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T, H> Registry<T, H>
where
    T: Clone + Eq + Hash + fmt::Debug,
{
    /// Resolve `call` against this registry.
    pub fn resolve<Hy>(&self, hierarchy: &Hy, call: &[T]) -> Result<&H, DispatchError<T>>
    where
        Hy: Hierarchy<Ty = T> + ?Sized,
    {
        self.resolve_named(hierarchy, None, call)
    }

    pub(crate) fn resolve_named<Hy>(
        &self,
        hierarchy: &Hy,
        function: Option<&str>,
        call: &[T],
    ) -> Result<&H, DispatchError<T>>
    where
        Hy: Hierarchy<Ty = T> + ?Sized,
    {
        DispatchResolver::new(hierarchy).resolve(function, call, self.bucket(call.len()))
    }
}

/// A registry paired with the hierarchy it dispatches over.
///
/// This is the value a component owns when it needs dispatch; independent
/// dispatchers never share state.
#[derive(Debug)]
pub struct Dispatcher<Hy: Hierarchy, H> {
    hierarchy: Hy,
    registry: Registry<Hy::Ty, H>,
}

impl<Hy: Hierarchy, H> Dispatcher<Hy, H> {
    pub fn new(hierarchy: Hy) -> Self {
        Self {
            hierarchy,
            registry: Registry::new(),
        }
    }

    /// Bind `signature` to `handle`. A later registration of an identical
    /// signature replaces the earlier one; the replaced handle is returned.
    pub fn register(&mut self, signature: impl Into<Signature<Hy::Ty>>, handle: H) -> Option<H> {
        let signature = signature.into();
        debug!(%signature, "registering method");
        let previous = self.registry.register(signature, handle);
        if previous.is_some() {
            debug!("replaced existing binding");
        }
        previous
    }

    /// Find the implementation for a call.
    pub fn resolve(&self, call: &[Hy::Ty]) -> Result<&H, DispatchError<Hy::Ty>> {
        self.registry.resolve(&self.hierarchy, call)
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

    /// Stop accepting registrations and share the result across threads.
    pub fn freeze(self) -> FrozenDispatcher<Hy, H> {
        FrozenDispatcher::new(Arc::new(self.hierarchy), Arc::new(self.registry))
    }

    /// Move into a handle that allows registration from several owners.
    pub fn into_shared(self) -> SharedDispatcher<Hy, H> {
        SharedDispatcher::from_parts(Arc::new(self.hierarchy), self.registry)
    }
}
