//! Dispatch errors.
//!
//! Resolution fails in exactly two ways, and callers depend on telling them
//! apart: nothing applies ([`NoMatchError`]) or several applicable methods
//! tie ([`AmbiguityError`]).

use std::fmt;

use thiserror::Error;

use super::types::{write_tuple, Signature};

/// No registered signature is applicable to the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no method{} matches call {}", function_label(.function), CallDisplay(.call))]
pub struct NoMatchError<T: fmt::Debug> {
    /// The function that was called, when dispatching through a named table.
    pub function: Option<String>,
    /// The argument types provided.
    pub call: Vec<T>,
    /// Number of registered signatures with the call's arity.
    pub considered: usize,
}

/// Several signatures apply and none is strictly more specific than all others.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "call{} {} is ambiguous between {} candidates",
    function_label(.function),
    CallDisplay(.call),
    .candidates.len()
)]
pub struct AmbiguityError<T: fmt::Debug> {
    /// The function that was called, when dispatching through a named table.
    pub function: Option<String>,
    /// The argument types provided.
    pub call: Vec<T>,
    /// The applicable signatures not dominated by any other, in registration order.
    pub candidates: Vec<Signature<T>>,
}

/// Why a call could not be dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError<T: fmt::Debug> {
    #[error(transparent)]
    NotFound(#[from] NoMatchError<T>),

    #[error(transparent)]
    Ambiguous(#[from] AmbiguityError<T>),
}

impl<T: fmt::Debug> DispatchError<T> {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DispatchError::NotFound(_))
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, DispatchError::Ambiguous(_))
    }

    /// The argument types of the failed call.
    pub fn call(&self) -> &[T] {
        match self {
            DispatchError::NotFound(err) => &err.call,
            DispatchError::Ambiguous(err) => &err.call,
        }
    }

    pub fn function(&self) -> Option<&str> {
        match self {
            DispatchError::NotFound(err) => err.function.as_deref(),
            DispatchError::Ambiguous(err) => err.function.as_deref(),
        }
    }

    /// Describe the failure, naming types with `namer`.
    ///
    /// Ambiguities list their candidates, e.g.
    /// `call process(D) is ambiguous: (B) | (C)`.
    pub fn describe_with(&self, namer: impl Fn(&T) -> String) -> String {
        let name = self.function().unwrap_or("");
        let call = Signature::new(self.call().iter().collect::<Vec<_>>());
        let call = call.display_with(|t| namer(*t));
        match self {
            DispatchError::NotFound(_) => format!("no method matches call {name}{call}"),
            DispatchError::Ambiguous(err) => {
                let candidates: Vec<_> = err
                    .candidates
                    .iter()
                    .map(|sig| sig.display_with(&namer).to_string())
                    .collect();
                format!(
                    "call {name}{call} is ambiguous: {}",
                    candidates.join(" | ")
                )
            }
        }
    }
}

fn function_label(function: &Option<String>) -> String {
    match function {
        Some(name) => format!(" `{name}`"),
        None => String::new(),
    }
}

struct CallDisplay<'a, T>(&'a [T]);

impl<T: fmt::Debug> fmt::Display for CallDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tuple(f, self.0, |t| format!("{t:?}"))
    }
}
