//! Recursive type expressions.
//!
//! A [`TypeRef`] is the GraphQL notion of a field/argument/variable type:
//! a named type or a list of some inner type, each level carrying its own
//! nullability. `[Movie!]` is a nullable list of non-null `Movie`.
//!
//! ## Examples
//!
//! ```
//! use crudkit_define::TypeRef;
//!
//! let ty = TypeRef::list(TypeRef::named("Movie").non_null()).non_null();
//! assert_eq!(ty.to_string(), "[Movie!]!");
//! assert_eq!(ty.innermost_name(), "Movie");
//! assert!(ty.is_list());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// One level of a type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRefKind {
    /// A reference to a type by name.
    Named(String),
    /// A list whose elements have the boxed type.
    List(Box<TypeRef>),
}

/// A possibly-nullable, possibly-list-wrapped reference to a named type.
///
/// Exactly one of "named type" or "element type" exists at every level;
/// the enum makes any other shape unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub kind: TypeRefKind,
    pub nullable: bool,
}

impl TypeRef {
    /// Creates a nullable reference to the named type.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            kind: TypeRefKind::Named(name.into()),
            nullable: true,
        }
    }

    /// Creates a nullable list of `element`.
    pub fn list(element: TypeRef) -> Self {
        Self {
            kind: TypeRefKind::List(Box::new(element)),
            nullable: true,
        }
    }

    /// Returns this type with the outermost level made non-null.
    #[must_use]
    pub fn non_null(self) -> Self {
        self.with_nullable(false)
    }

    /// Returns this type with the outermost nullability replaced.
    ///
    /// Inner levels keep their own nullability.
    ///
    /// ```
    /// use crudkit_define::TypeRef;
    ///
    /// let ty = TypeRef::list(TypeRef::named("ID").non_null()).non_null();
    /// assert_eq!(ty.with_nullable(true).to_string(), "[ID!]");
    /// ```
    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Returns `true` if the outermost level is a list.
    pub fn is_list(&self) -> bool {
        matches!(self.kind, TypeRefKind::List(_))
    }

    /// Returns the element type if the outermost level is a list.
    pub fn element(&self) -> Option<&TypeRef> {
        match &self.kind {
            TypeRefKind::List(element) => Some(element),
            TypeRefKind::Named(_) => None,
        }
    }

    /// Returns the name of the named type at the bottom of the list nesting.
    pub fn innermost_name(&self) -> &str {
        let mut current = self;
        loop {
            match &current.kind {
                TypeRefKind::Named(name) => return name,
                TypeRefKind::List(element) => current = element,
            }
        }
    }

    /// Returns a copy with the innermost named type replaced by `name`,
    /// keeping every level's list wrapping and nullability.
    #[must_use]
    pub fn with_innermost_name(&self, name: &str) -> Self {
        let kind = match &self.kind {
            TypeRefKind::Named(_) => TypeRefKind::Named(name.to_string()),
            TypeRefKind::List(element) => {
                TypeRefKind::List(Box::new(element.with_innermost_name(name)))
            }
        };
        Self {
            kind,
            nullable: self.nullable,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeRefKind::Named(name) => write!(f, "{name}")?,
            TypeRefKind::List(element) => write!(f, "[{element}]")?,
        }
        if !self.nullable {
            write!(f, "!")?;
        }
        Ok(())
    }
}
