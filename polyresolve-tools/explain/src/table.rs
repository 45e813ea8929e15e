//! Dispatch Tables
//!
//! A dispatch table file declares a type hierarchy, the methods of one or
//! more functions, and the calls to resolve against them.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use polyresolve::{FunctionTable, HierarchyError, Signature, TyId, TypeGraph};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading a dispatch table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid dispatch table: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error("{context}: unknown type `{name}`")]
    UnknownType { context: String, name: String },

    #[error("method of `{function}` uses reserved handle `{handle}`")]
    ReservedHandle { function: String, handle: String },
}

/// The on-disk shape of a dispatch table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFile {
    pub types: Vec<TypeDecl>,
    pub methods: Vec<MethodDecl>,
    pub calls: Vec<CallDecl>,
}

/// A type and its direct supertypes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub parents: Vec<String>,
}

/// One method of a named function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub function: String,
    #[serde(default)]
    pub params: Vec<String>,
    pub handle: String,
}

/// A call to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallDecl {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect: Option<Expectation>,
}

/// The outcome a call is expected to have.
///
/// Written in table files as a handle name, or as `"not-found"` or
/// `"ambiguous"`. Those two words are reserved and cannot name a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Expectation {
    Handle(String),
    NotFound,
    Ambiguous,
}

impl From<String> for Expectation {
    fn from(value: String) -> Self {
        match value.as_str() {
            "not-found" => Expectation::NotFound,
            "ambiguous" => Expectation::Ambiguous,
            _ => Expectation::Handle(value),
        }
    }
}

impl From<Expectation> for String {
    fn from(value: Expectation) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Handle(handle) => write!(f, "{handle}"),
            Expectation::NotFound => write!(f, "not-found"),
            Expectation::Ambiguous => write!(f, "ambiguous"),
        }
    }
}

/// A call with its argument types looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub function: String,
    pub args: Vec<TyId>,
    pub expect: Option<Expectation>,
}

/// A loaded dispatch table, ready to resolve its calls.
#[derive(Debug)]
pub struct DispatchTable {
    functions: FunctionTable<TypeGraph, String>,
    calls: Vec<Call>,
}

impl DispatchTable {
    /// Load a table from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&source)
    }

    /// Parse a table from TOML source.
    pub fn from_toml(source: &str) -> Result<Self, TableError> {
        let file: TableFile = toml::from_str(source)?;
        Self::from_file(&file)
    }

    /// Build a table from its parsed form.
    ///
    /// Types must be declared before they are used as parents.
    pub fn from_file(file: &TableFile) -> Result<Self, TableError> {
        let mut types = TypeGraph::new();
        for decl in &file.types {
            let parents: Vec<&str> = decl.parents.iter().map(String::as_str).collect();
            types.declare(decl.name.as_str(), &parents)?;
        }

        let mut methods = Vec::with_capacity(file.methods.len());
        for decl in &file.methods {
            if Expectation::from(decl.handle.clone()) != Expectation::Handle(decl.handle.clone()) {
                return Err(TableError::ReservedHandle {
                    function: decl.function.clone(),
                    handle: decl.handle.clone(),
                });
            }
            let context = format!("method `{}` of `{}`", decl.handle, decl.function);
            let params = lookup_all(&types, &decl.params, &context)?;
            methods.push((decl.function.clone(), params, decl.handle.clone()));
        }

        let mut calls = Vec::with_capacity(file.calls.len());
        for decl in &file.calls {
            let context = format!("call to `{}`", decl.function);
            calls.push(Call {
                function: decl.function.clone(),
                args: lookup_all(&types, &decl.args, &context)?,
                expect: decl.expect.clone(),
            });
        }

        let mut functions = FunctionTable::new(types);
        for (function, params, handle) in methods {
            if let Some(previous) = functions.register(function, params, handle) {
                debug!(%previous, "method overridden later in table");
            }
        }

        Ok(Self { functions, calls })
    }

    pub fn functions(&self) -> &FunctionTable<TypeGraph, String> {
        &self.functions
    }

    pub fn types(&self) -> &TypeGraph {
        self.functions.hierarchy()
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Name of a declared type.
    pub fn type_name(&self, id: TyId) -> String {
        self.types().name(id).unwrap_or("?").to_string()
    }

    /// Render a signature with declared type names.
    pub fn render(&self, signature: &Signature<TyId>) -> String {
        self.types().render(signature)
    }
}

fn lookup_all(types: &TypeGraph, names: &[String], context: &str) -> Result<Vec<TyId>, TableError> {
    names
        .iter()
        .map(|name| {
            types.lookup(name).ok_or_else(|| TableError::UnknownType {
                context: context.to_string(),
                name: name.clone(),
            })
        })
        .collect()
}
