//! crudkit definition library
//!
//! Plain data types shared by every stage of crudkit code generation. Nothing
//! here parses GraphQL or writes files; the `crudkit-gen` crate consumes
//! these types.
//!
//! ## Core Types
//!
//! ### Schema
//!
//! - [`TypeRef`] - Recursive type expression (named type or list, with nullability)
//! - [`Schema`] - Ordered type map plus the `Query`/`Mutation` roots
//! - [`TypeDef`] - A named object, input, or scalar type
//! - [`FieldDef`] / [`ArgumentDef`] - Fields and their arguments
//!
//! ### Operations
//!
//! - [`Operation`] - A named query or mutation
//! - [`VariableDecl`] - A declared variable with its optional `@pick` list
//! - [`Selection`] - One entry of a selection set
//!
//! ### Generated Classes
//!
//! - [`GeneratedClassModel`] - Variables class, response class, and the
//!   operation-level convenience function for one operation
//! - [`GeneratedClass`] - A data class with nested classes and constructors
//! - [`ForwardingArgument`] - Rebuilds nested objects from flattened parameters
//!
//! ## Examples
//!
//! ```
//! use crudkit_define::{FieldDef, Schema, TypeDef, TypeRef};
//!
//! let mut schema = Schema::new();
//! schema.insert_type(TypeDef::object(
//!     "Movie",
//!     vec![
//!         FieldDef::new("id", TypeRef::named("ID").non_null()),
//!         FieldDef::new("title", TypeRef::named("String").non_null()),
//!     ],
//! ));
//!
//! let movie = schema.get("Movie").unwrap();
//! assert_eq!(movie.fields.len(), 2);
//! ```

pub mod model;
pub mod operation;
pub mod prelude;
pub mod scalar;
pub mod schema;
pub mod type_ref;

pub use model::{
    ConstructorCall, ForwardedValue, ForwardingArgument, FunctionParameter, GeneratedClass,
    GeneratedClassModel, RenderedType, SecondaryConstructor,
};
pub use operation::{FieldSelection, Operation, OperationKind, Selection, VariableDecl};
pub use schema::{ArgumentDef, FieldDef, Schema, TypeDef, TypeKind};
pub use type_ref::{TypeRef, TypeRefKind};
