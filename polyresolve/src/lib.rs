//! Multiple dispatch over an explicit subtype hierarchy.
//!
//! Clients describe their types to a [`Hierarchy`] (usually a
//! [`TypeGraph`]), register implementations under parameter
//! [`Signature`]s, and resolve calls by the concrete types of their
//! arguments:
//!
//! ```
//! use polyresolve::{Dispatcher, TypeGraph};
//!
//! let mut types = TypeGraph::new();
//! let a = types.declare("A", &[]).unwrap();
//! let b = types.declare("B", &["A"]).unwrap();
//!
//! let mut dispatch = Dispatcher::new(types);
//! dispatch.register([a], "process_a");
//! dispatch.register([b], "process_b");
//!
//! assert_eq!(dispatch.resolve(&[b]), Ok(&"process_b"));
//! assert_eq!(dispatch.resolve(&[a]), Ok(&"process_a"));
//! ```

pub mod dispatch;
pub mod hierarchy;

pub use dispatch::{
    AmbiguityError, DispatchError, DispatchResolver, Dispatcher, FrozenDispatcher,
    FunctionTable, NoMatchError, Registry, SharedDispatcher, Signature,
};
pub use hierarchy::{FnHierarchy, Hierarchy, HierarchyError, TyId, TypeGraph};
