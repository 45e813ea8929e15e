//! Subtype hierarchies consumed by dispatch resolution.
//!
//! The resolver never looks at types directly. Everything it needs is the
//! `is_subtype` predicate exposed by [`Hierarchy`], which makes the
//! hierarchy the injectable strategy of a resolver: swap the hierarchy and
//! you change both applicability and specificity.
//!
//! [`TypeGraph`] is the bundled implementation: an explicit DAG with
//! multiple inheritance whose transitive closure is computed once, when a
//! type is declared.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;
use tracing::trace;

use crate::dispatch::Signature;

/// A subtype relation over some notion of type.
///
/// Implementations must be reflexive and transitive. Antisymmetry is
/// assumed by the specificity ordering but not checked.
pub trait Hierarchy {
    /// The type identity dispatched on.
    type Ty: Clone + Eq + Hash + fmt::Debug;

    /// Returns true if `a` is a subtype of (or the same type as) `b`.
    fn is_subtype(&self, a: &Self::Ty, b: &Self::Ty) -> bool;
}

impl<H: Hierarchy + ?Sized> Hierarchy for &H {
    type Ty = H::Ty;

    fn is_subtype(&self, a: &Self::Ty, b: &Self::Ty) -> bool {
        (**self).is_subtype(a, b)
    }
}

impl<H: Hierarchy + ?Sized> Hierarchy for Arc<H> {
    type Ty = H::Ty;

    fn is_subtype(&self, a: &Self::Ty, b: &Self::Ty) -> bool {
        (**self).is_subtype(a, b)
    }
}

/// A hierarchy backed by a caller-supplied predicate.
///
/// Identity is always accepted, so the predicate only has to describe
/// proper subtyping.
pub struct FnHierarchy<T, F> {
    predicate: F,
    _ty: PhantomData<fn(&T, &T) -> bool>,
}

impl<T, F> FnHierarchy<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    /// Wrap a subtype predicate.
    pub fn new(predicate: F) -> Self {
        Self {
            predicate,
            _ty: PhantomData,
        }
    }
}

impl<T, F> Hierarchy for FnHierarchy<T, F>
where
    T: Clone + Eq + Hash + fmt::Debug,
    F: Fn(&T, &T) -> bool,
{
    type Ty = T;

    fn is_subtype(&self, a: &T, b: &T) -> bool {
        a == b || (self.predicate)(a, b)
    }
}

impl<T, F> fmt::Debug for FnHierarchy<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHierarchy").finish_non_exhaustive()
    }
}

/// Identifier of a type declared in a [`TypeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TyId {
    pub index: u32,
}

impl TyId {
    pub fn new(index: u32) -> Self {
        Self { index }
    }
}

/// Errors raised while declaring or looking up types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("type `{0}` is already declared")]
    DuplicateType(String),

    #[error("type `{ty}` names undeclared parent `{parent}`")]
    UnknownParent { ty: String, parent: String },

    #[error("unknown type `{0}`")]
    UnknownType(String),

    #[error("cannot declare `{0}`: type id space is exhausted")]
    TooManyTypes(String),
}

#[derive(Debug, Clone)]
struct TypeNode {
    name: String,
    parents: Vec<TyId>,
    /// Every supertype of this node, itself included.
    ancestors: FxHashSet<TyId>,
}

/// An explicit type DAG with multiple inheritance.
///
/// Parents must be declared before their children, so the graph can never
/// contain a cycle.
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    nodes: Vec<TypeNode>,
    by_name: FxHashMap<String, TyId>,
}

impl TypeGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a type with the given direct supertypes.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        parents: &[&str],
    ) -> Result<TyId, HierarchyError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(HierarchyError::DuplicateType(name));
        }

        let mut parent_ids: Vec<TyId> = Vec::with_capacity(parents.len());
        for parent in parents {
            let Some(&id) = self.by_name.get(*parent) else {
                return Err(HierarchyError::UnknownParent {
                    ty: name,
                    parent: (*parent).to_string(),
                });
            };
            if !parent_ids.contains(&id) {
                parent_ids.push(id);
            }
        }

        let id = match next_id(self.nodes.len()) {
            Some(id) => id,
            None => return Err(HierarchyError::TooManyTypes(name)),
        };
        let mut ancestors = FxHashSet::default();
        ancestors.insert(id);
        for parent in &parent_ids {
            ancestors.extend(self.nodes[parent.index as usize].ancestors.iter().copied());
        }

        trace!(ty = %name, ?id, parents = parent_ids.len(), "declared type");

        self.by_name.insert(name.clone(), id);
        self.nodes.push(TypeNode {
            name,
            parents: parent_ids,
            ancestors,
        });
        Ok(id)
    }

    /// Look up a type by name.
    pub fn lookup(&self, name: &str) -> Option<TyId> {
        self.by_name.get(name).copied()
    }

    /// Look up a type by name, failing with [`HierarchyError::UnknownType`].
    pub fn expect(&self, name: &str) -> Result<TyId, HierarchyError> {
        self.lookup(name)
            .ok_or_else(|| HierarchyError::UnknownType(name.to_string()))
    }

    /// The declared name of a type.
    pub fn name(&self, id: TyId) -> Option<&str> {
        self.node(id).map(|n| n.name.as_str())
    }

    /// Direct supertypes, in declaration order.
    pub fn parents(&self, id: TyId) -> &[TyId] {
        self.node(id).map(|n| n.parents.as_slice()).unwrap_or(&[])
    }

    /// All supertypes of `id`, itself included, sorted by id.
    pub fn ancestors(&self, id: TyId) -> Vec<TyId> {
        let mut ancestors: Vec<_> = self
            .node(id)
            .map(|n| n.ancestors.iter().copied().collect())
            .unwrap_or_default();
        ancestors.sort();
        ancestors
    }

    /// Returns true if `a` is a subtype of `b` and the two differ.
    pub fn is_strict_subtype(&self, a: TyId, b: TyId) -> bool {
        a != b && self.is_subtype(&a, &b)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over declared types in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (TyId, &str)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (TyId::new(i as u32), n.name.as_str()))
    }

    /// Render a signature using declared type names.
    pub fn render(&self, signature: &Signature<TyId>) -> String {
        signature
            .display_with(|id| self.name(*id).unwrap_or("?").to_string())
            .to_string()
    }

    fn node(&self, id: TyId) -> Option<&TypeNode> {
        self.nodes.get(id.index as usize)
    }
}

/// Id for the type declared after `len` others, if it fits in a `TyId`.
fn next_id(len: usize) -> Option<TyId> {
    u32::try_from(len).ok().map(TyId::new)
}

impl Hierarchy for TypeGraph {
    type Ty = TyId;

    fn is_subtype(&self, a: &TyId, b: &TyId) -> bool {
        a == b || self.node(*a).is_some_and(|n| n.ancestors.contains(b))
    }
}
