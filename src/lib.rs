//! graphql to go code generator
//!
//! this crate turns a graphql schema plus a set of operation documents into
//! a single go source file: one type definition per schema type and, per
//! named operation, a variables type, a response type mirroring the
//! selection nesting exactly, and fixed request/response boilerplate.
//! start with [`Generator`] and [`Config`]. for command line use, see the
//! `gqlgo-codegen` binary.
//!
//! ## quick start
//!
//! ```
//! use gqlgo::{Config, Generator};
//! use graphql_parser::{parse_query, parse_schema};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = parse_schema::<String>("type Query { ping: String }")?;
//! let document = parse_query::<String>("query Ping { ping }")?;
//! let generator = Generator::new(&schema, Config::new())?;
//! let code = generator.generate(&[document])?;
//! assert!(code.contains("type PingResponse struct"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! the input asts are assumed pre-validated; generation either returns the
//! complete output blob or fails fast naming the offending construct.

mod catalog;
mod config;
mod error;
mod fields;
mod generator;
mod naming;
mod operations;
mod template;

pub use catalog::{CatalogEntry, TypeCatalog, TypeKind, BUILTIN_SCALARS};
pub use config::{Config, Manifest, DEFAULT_PACKAGE};
pub use error::{Error, Result};
pub use fields::{resolve_field, FieldDecl};
pub use generator::Generator;
pub use naming::export_name;
pub use operations::{OperationBlock, OperationSynthesizer};
pub use template::render;
