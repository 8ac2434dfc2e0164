//! Code generation for the Rust target.
//!
//! This module turns a [`GeneratedClassModel`](crudkit_define::GeneratedClassModel)
//! into Rust source. Each operation becomes one module file.
//!
//! ## Submodules
//!
//! - [`naming`] - Maps GraphQL names to Rust identifiers
//! - `class` - Generates structs, constructors, and nested type modules
//! - `operation` - Generates the complete module for one operation
//!
//! ## Output Format
//!
//! All generators return `proc_macro2::TokenStream`, which is then:
//! - Validated with `syn::parse2` to ensure correctness
//! - Formatted with `prettyplease` for consistent style
//!
//! See [`crate::output`] for the assembly and file writing logic.

mod class;
pub mod naming;
mod operation;

pub use operation::{generate_operation, operation_module_name, parse_package};
