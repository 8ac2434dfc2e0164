//! Schema model consumed and produced by augmentation.
//!
//! A [`Schema`] maps type names to [`TypeDef`]s in declaration order and
//! holds the `Query` and `Mutation` root types separately. Field and
//! argument order is significant everywhere: it becomes parameter order in
//! generated code.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::operation::OperationKind;
use crate::scalar::BUILTIN_SCALARS;
use crate::type_ref::TypeRef;

/// Kind of a type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum TypeKind {
    /// An output object type (`type Movie { ... }`).
    Object,
    /// An input object type (`input Movie_Data { ... }`).
    Input,
    /// A scalar: one of the built-ins or a result marker.
    Scalar,
}

/// A named argument of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDef {
    pub name: String,
    pub ty: TypeRef,
    pub description: Option<String>,
}

impl ArgumentDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
        }
    }
}

/// A field of an object or input type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
    pub arguments: Vec<ArgumentDef>,
    pub description: Option<String>,
}

impl FieldDef {
    /// Creates a field with no arguments and no description.
    ///
    /// ```
    /// use crudkit_define::{FieldDef, TypeRef};
    ///
    /// let field = FieldDef::new("title", TypeRef::named("String").non_null());
    /// assert_eq!(field.ty.to_string(), "String!");
    /// assert!(field.arguments.is_empty());
    /// ```
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            arguments: Vec::new(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_arguments(mut self, arguments: Vec<ArgumentDef>) -> Self {
        self.arguments = arguments;
        self
    }
}

/// A named type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    pub name: String,
    pub kind: TypeKind,
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
    /// Built-in scalar or system type; never subject to CRUD synthesis.
    pub builtin: bool,
    pub description: Option<String>,
}

impl TypeDef {
    /// Creates a user-declared object type.
    pub fn object(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Object,
            fields,
            builtin: false,
            description: None,
        }
    }

    /// Creates a built-in scalar type.
    pub fn builtin_scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Scalar,
            fields: Vec::new(),
            builtin: true,
            description: None,
        }
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns `true` if a field with the given name exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn is_scalar(&self) -> bool {
        self.kind == TypeKind::Scalar
    }
}

/// A complete schema: the type map plus the two root operation types.
///
/// ## Examples
///
/// ```
/// use crudkit_define::{FieldDef, Schema, TypeDef, TypeRef};
///
/// let mut schema = Schema::new();
/// schema.insert_type(TypeDef::object(
///     "Movie",
///     vec![FieldDef::new("title", TypeRef::named("String").non_null())],
/// ));
///
/// assert!(schema.get("Movie").is_some());
/// assert!(schema.get("String").is_some_and(|ty| ty.builtin));
/// assert_eq!(schema.user_type_names(), vec!["Movie".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Every non-root type, keyed by name, in declaration order.
    pub types: IndexMap<String, TypeDef>,
    /// Root type for queries.
    pub query: TypeDef,
    /// Root type for mutations.
    pub mutation: TypeDef,
}

impl Schema {
    /// Creates a schema holding only the built-in scalars and empty
    /// `Query`/`Mutation` roots.
    pub fn new() -> Self {
        Self::with_roots("Query", "Mutation")
    }

    /// Creates a schema with custom root type names.
    pub fn with_roots(query: impl Into<String>, mutation: impl Into<String>) -> Self {
        let types = BUILTIN_SCALARS
            .iter()
            .map(|name| (name.to_string(), TypeDef::builtin_scalar(*name)))
            .collect();
        Self {
            types,
            query: TypeDef::object(query, Vec::new()),
            mutation: TypeDef::object(mutation, Vec::new()),
        }
    }

    /// Inserts a type, replacing any existing definition with the same name.
    ///
    /// A replaced definition keeps its original position.
    pub fn insert_type(&mut self, type_def: TypeDef) {
        self.types.insert(type_def.name.clone(), type_def);
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TypeDef> {
        self.types.get_mut(name)
    }

    /// Returns the root type for the given operation kind.
    pub fn root(&self, kind: OperationKind) -> &TypeDef {
        match kind {
            OperationKind::Query => &self.query,
            OperationKind::Mutation => &self.mutation,
        }
    }

    /// Names of all non-builtin types, in declaration order.
    pub fn user_type_names(&self) -> Vec<String> {
        self.types
            .values()
            .filter(|ty| !ty.builtin)
            .map(|ty| ty.name.clone())
            .collect()
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}
