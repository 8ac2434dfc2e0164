//! crudkit code generator library.
//!
//! Turns a GraphQL schema plus a set of operation documents into a typed
//! Rust SDK: one module per operation holding a variables struct, a
//! response struct, nested types, and a `variables(...)` convenience
//! function that takes flattened scalar parameters.
//!
//! ## Pipeline
//!
//! 1. [`frontend::load_schema`] reads the user SDL into a [`crudkit_define::Schema`]
//! 2. [`augment::augment`] adds CRUD inputs, mutations, queries, and relation fields
//! 3. [`frontend::seal`] validates the augmented schema
//! 4. [`frontend::load_operations`] validates and converts the operation documents
//! 5. [`builder::build`] produces a [`crudkit_define::GeneratedClassModel`] per operation
//! 6. [`output::render_files`] generates and formats the Rust modules
//!
//! [`pipeline::run`] drives all of it from a [`config::GeneratorConfig`].
//!
//! ## Modules
//!
//! - [`augment`] - Schema augmentation engine
//! - [`picker`] - `@pick` and selection-set projections
//! - [`builder`] - Operation model builder
//! - [`codegen`] - Rust code generation from class models
//! - [`output`] - Validation, formatting, and atomic writes
//! - [`sink`] - Generation events and their `tracing` sink
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use crudkit_gen::config::GeneratorConfig;
//! use crudkit_gen::pipeline::run;
//! use crudkit_gen::sink::TracingSink;
//!
//! let config = GeneratorConfig::new("schema.graphql", Path::new("src/sdk"))
//!     .with_operations(["operations.graphql"])
//!     .with_package("crate::sdk");
//!
//! let output = run(&config, &mut TracingSink).unwrap();
//! println!("generated {} files", output.files.len());
//! ```

pub mod augment;
pub mod builder;
pub mod codegen;
pub mod config;
pub mod errors;
pub mod frontend;
pub mod inflection;
pub mod output;
pub mod picker;
pub mod pipeline;
pub mod sink;

#[cfg(test)]
pub(crate) mod test_utils;
