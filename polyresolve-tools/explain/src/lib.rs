//! Polyresolve Explain
//!
//! Loads dispatch table files, resolves the calls they declare and reports
//! how each one was dispatched. With expectations in the table it doubles as
//! a regression check for dispatch rules.
//!
//! # Example
//!
//! ```
//! use polyresolve_explain::{explain, DispatchTable, Outcome};
//!
//! let table = DispatchTable::from_toml(r#"
//!     [[types]]
//!     name = "Animal"
//!     [[types]]
//!     name = "Cat"
//!     parents = ["Animal"]
//!
//!     [[methods]]
//!     function = "speak"
//!     params = ["Animal"]
//!     handle = "generic"
//!
//!     [[calls]]
//!     function = "speak"
//!     args = ["Cat"]
//! "#).unwrap();
//!
//! let reports = explain(&table);
//! assert_eq!(reports[0].outcome, Outcome::Resolved { handle: "generic".into() });
//! ```

pub mod config;
pub mod report;
pub mod table;

pub use config::{Config, OutputFormat};
pub use report::{explain, explain_call, CallReport, Outcome, Summary};
pub use table::{Call, DispatchTable, Expectation, TableError, TableFile};
