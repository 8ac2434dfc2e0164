//! Convenient re-exports for working with crudkit definitions.
//!
//! ## Examples
//!
//! ```
//! use crudkit_define::prelude::*;
//!
//! let op = Operation {
//!     name: "GetMovie".to_string(),
//!     kind: OperationKind::Query,
//!     variables: vec![VariableDecl::new("id", TypeRef::named("ID").non_null())],
//!     selections: vec![Selection::field_with("movie", vec![Selection::field("title")])],
//! };
//! assert_eq!(op.variables.len(), 1);
//! ```

pub use crate::model::{
    ConstructorCall, ForwardedValue, ForwardingArgument, FunctionParameter, GeneratedClass,
    GeneratedClassModel, RenderedType, SecondaryConstructor,
};
pub use crate::operation::{FieldSelection, Operation, OperationKind, Selection, VariableDecl};
pub use crate::schema::{ArgumentDef, FieldDef, Schema, TypeDef, TypeKind};
pub use crate::type_ref::{TypeRef, TypeRefKind};
