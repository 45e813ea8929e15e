//! Named generic functions, each with its own method set.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tracing::debug;

use crate::hierarchy::Hierarchy;

use super::registry::Registry;
use super::result::{DispatchError, NoMatchError};
use super::types::Signature;

/// A set of named functions dispatching over one hierarchy.
///
/// Methods registered under different names never compete: resolving
/// `process` only considers signatures registered for `process`.
#[derive(Debug)]
pub struct FunctionTable<Hy: Hierarchy, H> {
    hierarchy: Hy,
    functions: IndexMap<String, Registry<Hy::Ty, H>, FxBuildHasher>,
}

impl<Hy: Hierarchy, H> FunctionTable<Hy, H> {
    pub fn new(hierarchy: Hy) -> Self {
        Self {
            hierarchy,
            functions: IndexMap::default(),
        }
    }

    /// Add a method to `function`, returning the handle it replaces.
    pub fn register(
        &mut self,
        function: impl Into<String>,
        signature: impl Into<Signature<Hy::Ty>>,
        handle: H,
    ) -> Option<H> {
        let function = function.into();
        let signature = signature.into();
        debug!(%function, %signature, "registering method");
        let previous = self
            .functions
            .entry(function)
            .or_default()
            .register(signature, handle);
        if previous.is_some() {
            debug!("replaced existing binding");
        }
        previous
    }

    /// Find the implementation of `function` for a call.
    ///
    /// Unknown functions have no applicable method and fail as not found.
    pub fn resolve(&self, function: &str, call: &[Hy::Ty]) -> Result<&H, DispatchError<Hy::Ty>> {
        match self.functions.get(function) {
            Some(registry) => registry.resolve_named(&self.hierarchy, Some(function), call),
            None => {
                debug!(function, "call to unknown function");
                Err(NoMatchError {
                    function: Some(function.to_string()),
                    call: call.to_vec(),
                    considered: 0,
                }
                .into())
            }
        }
    }

    /// Function names in first-registration order.
    pub fn functions(&self) -> impl Iterator<Item = &str> + '_ {
        self.functions.keys().map(String::as_str)
    }

    /// Signatures registered for `function`.
    pub fn methods(&self, function: &str) -> Vec<&Signature<Hy::Ty>> {
        self.functions
            .get(function)
            .map(|registry| registry.signatures().collect())
            .unwrap_or_default()
    }

    pub fn registry(&self, function: &str) -> Option<&Registry<Hy::Ty, H>> {
        self.functions.get(function)
    }

    pub fn hierarchy(&self) -> &Hy {
        &self.hierarchy
    }

    /// Total number of methods across all functions.
    pub fn len(&self) -> usize {
        self.functions.values().map(Registry::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
