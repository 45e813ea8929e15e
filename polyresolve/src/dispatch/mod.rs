//! Multiple dispatch resolution.
//!
//! This module selects which implementation to run based on the runtime
//! types of all arguments of a call.
//!
//! # Algorithm Overview
//!
//! 1. **Collect candidates**: Registered signatures with the call's arity
//! 2. **Filter applicable**: Keep signatures where each argument type is a
//!    subtype of the parameter type
//! 3. **Select dominator**: The winner must be strictly more specific than
//!    *every* other applicable signature
//! 4. **Fail precisely**: Nothing applicable is [`DispatchError::NotFound`];
//!    no total dominator is [`DispatchError::Ambiguous`]
//!
//! Step 3 deliberately rejects diamonds: with methods for `B` and `C`, a
//! call with `D <: B, C` stays ambiguous until a method for `D` (or any
//! signature dominating both) is registered.
//!
//! # Module Structure
//!
//! - [`types`] - Signatures and their rendering
//! - [`result`] - Dispatch errors
//! - [`resolver`] - The resolution algorithm
//! - [`registry`] - Signature storage and the owning [`Dispatcher`]
//! - [`table`] - Named function tables
//! - [`shared`] - Lock-guarded and frozen dispatchers for concurrent use

mod registry;
mod resolver;
mod result;
mod shared;
mod table;
mod types;


pub use types::{Signature, SignatureDisplay};

pub use result::{AmbiguityError, DispatchError, NoMatchError};

pub use resolver::DispatchResolver;

pub use registry::{Dispatcher, Registry};

pub use table::FunctionTable;

pub use shared::{FrozenDispatcher, SharedDispatcher};
