//! The dispatch resolution algorithm.

use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::hierarchy::Hierarchy;

use super::result::{AmbiguityError, DispatchError, NoMatchError};
use super::types::Signature;

/// Dispatch resolution context.
///
/// Borrows the hierarchy that answers subtype queries; it holds no other
/// state, so one resolver can serve any number of registries.
#[derive(Debug)]
pub struct DispatchResolver<'h, H: ?Sized> {
    hierarchy: &'h H,
}

impl<H: ?Sized> Clone for DispatchResolver<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H: ?Sized> Copy for DispatchResolver<'_, H> {}

impl<'h, H: Hierarchy + ?Sized> DispatchResolver<'h, H> {
    /// Create a new dispatch resolver.
    pub fn new(hierarchy: &'h H) -> Self {
        Self { hierarchy }
    }

    /// Resolve dispatch for a call.
    ///
    /// `candidates` are the registered signatures with their bound handles.
    /// Returns the handle of the unique signature that is strictly more
    /// specific than every other applicable one.
    pub fn resolve<'r, V, I>(
        &self,
        function: Option<&str>,
        call: &[H::Ty],
        candidates: I,
    ) -> Result<&'r V, DispatchError<H::Ty>>
    where
        I: IntoIterator<Item = (&'r Signature<H::Ty>, &'r V)>,
        H::Ty: 'r,
        V: 'r,
    {
        // Step 1: Filter to applicable methods
        let mut considered = 0;
        let mut applicable = Vec::new();
        for (signature, handle) in candidates {
            if signature.arity() != call.len() {
                continue;
            }
            considered += 1;
            if self.is_applicable(signature, call) {
                applicable.push((signature, handle));
            }
        }

        // Step 2: Handle no matches
        if applicable.is_empty() {
            debug!(?function, ?call, considered, "no applicable method");
            return Err(NoMatchError {
                function: function.map(str::to_string),
                call: call.to_vec(),
                considered,
            }
            .into());
        }

        if let [(_, handle)] = applicable.as_slice() {
            return Ok(*handle);
        }

        // Step 3: Require a total dominator
        let signatures: Vec<_> = applicable.iter().map(|(sig, _)| *sig).collect();
        if let Some(winner) = self.select_dominator(&signatures) {
            trace!(?call, signature = ?signatures[winner], "selected total dominator");
            return Ok(applicable[winner].1);
        }

        // Step 4: Ambiguity error
        let mut maximal = self.find_maximal(&signatures);
        if maximal.is_empty() {
            // Every signature is dominated, so the predicate has a cycle.
            maximal = signatures;
        }
        let candidates: Vec<_> = maximal.into_iter().cloned().collect();
        debug!(?function, ?call, candidates = candidates.len(), "ambiguous call");
        Err(AmbiguityError {
            function: function.map(str::to_string),
            call: call.to_vec(),
            candidates,
        }
        .into())
    }

    /// Check if a signature is applicable to the given argument types.
    ///
    /// A signature is applicable if:
    /// - It has the same arity as the call
    /// - Each argument type is a subtype of the corresponding parameter type
    pub fn is_applicable(&self, signature: &Signature<H::Ty>, call: &[H::Ty]) -> bool {
        signature.arity() == call.len()
            && call
                .iter()
                .zip(signature)
                .all(|(arg, param)| self.hierarchy.is_subtype(arg, param))
    }

    /// Check if `s1` is strictly more specific than `s2`.
    ///
    /// `s1` is more specific than `s2` if:
    /// - Every parameter of `s1` is a subtype of the one in `s2`
    /// - At least one parameter differs
    pub fn is_more_specific(&self, s1: &Signature<H::Ty>, s2: &Signature<H::Ty>) -> bool {
        if s1.arity() != s2.arity() {
            return false;
        }

        let mut some_differs = false;
        for (p1, p2) in s1.iter().zip(s2) {
            if !self.hierarchy.is_subtype(p1, p2) {
                return false;
            }
            if p1 != p2 {
                some_differs = true;
            }
        }

        some_differs
    }

    /// Compare the specificity of two signatures.
    ///
    /// Returns:
    /// - Ordering::Less if s1 is more specific
    /// - Ordering::Greater if s2 is more specific
    /// - Ordering::Equal if neither is (incomparable or identical)
    pub fn compare_specificity(&self, s1: &Signature<H::Ty>, s2: &Signature<H::Ty>) -> Ordering {
        let s1_more = self.is_more_specific(s1, s2);
        let s2_more = self.is_more_specific(s2, s1);

        match (s1_more, s2_more) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }

    /// Find the index of the signature strictly more specific than every
    /// other one, if exactly one such signature exists.
    ///
    /// Being undominated is not enough: two incomparable signatures with no
    /// common refinement yield `None`.
    pub fn select_dominator(&self, applicable: &[&Signature<H::Ty>]) -> Option<usize> {
        let mut winner = None;

        for (i, s) in applicable.iter().enumerate() {
            let dominates_all = applicable
                .iter()
                .enumerate()
                .all(|(j, other)| i == j || self.is_more_specific(s, other));

            if dominates_all {
                if winner.is_some() {
                    return None;
                }
                winner = Some(i);
            }
        }

        winner
    }

    /// Find the maximally specific signatures from the applicable set.
    ///
    /// A signature is maximal if no other signature is strictly more specific.
    pub fn find_maximal<'s>(
        &self,
        applicable: &[&'s Signature<H::Ty>],
    ) -> Vec<&'s Signature<H::Ty>> {
        applicable
            .iter()
            .enumerate()
            .filter(|(i, s)| {
                !applicable
                    .iter()
                    .enumerate()
                    .any(|(j, other)| *i != j && self.is_more_specific(other, s))
            })
            .map(|(_, s)| *s)
            .collect()
    }
}
