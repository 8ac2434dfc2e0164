//! Parsed operation model.
//!
//! These types describe one named query or mutation after it has been
//! parsed and validated: its variables (with any `@pick` field list) and its
//! response selection tree.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::type_ref::TypeRef;

/// Whether an operation reads or writes.
///
/// ```
/// use std::str::FromStr;
/// use crudkit_define::OperationKind;
///
/// assert_eq!(OperationKind::Mutation.to_string(), "mutation");
/// assert_eq!(OperationKind::from_str("query").unwrap(), OperationKind::Query);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
}

/// A declared operation variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDecl {
    /// Variable name without the leading `$`.
    pub name: String,
    pub ty: TypeRef,
    /// Field names listed by a `@pick(fields: [...])` directive, in the
    /// order written. `None` when the directive is absent.
    pub pick: Option<Vec<String>>,
}

impl VariableDecl {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            pick: None,
        }
    }

    #[must_use]
    pub fn with_pick<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pick = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}

/// A plain field selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelection {
    pub name: String,
    pub alias: Option<String>,
    pub selections: Vec<Selection>,
}

impl FieldSelection {
    /// Key under which the field appears in the response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// One entry of a selection set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Field(FieldSelection),
    FragmentSpread { name: String },
    InlineFragment { type_condition: Option<String> },
}

impl Selection {
    /// Creates a leaf field selection.
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(FieldSelection {
            name: name.into(),
            alias: None,
            selections: Vec::new(),
        })
    }

    /// Creates a field selection with a sub-selection.
    pub fn field_with(name: impl Into<String>, selections: Vec<Selection>) -> Self {
        Self::Field(FieldSelection {
            name: name.into(),
            alias: None,
            selections,
        })
    }

    /// Short human-readable description of the selection kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Field(_) => "field",
            Self::FragmentSpread { .. } => "fragment spread",
            Self::InlineFragment { .. } => "inline fragment",
        }
    }
}

/// A named, validated operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    pub kind: OperationKind,
    pub variables: Vec<VariableDecl>,
    pub selections: Vec<Selection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_key_prefers_alias() {
        let field = FieldSelection {
            name: "movie".to_string(),
            alias: Some("favorite".to_string()),
            selections: vec![],
        };
        assert_eq!(field.response_key(), "favorite");
    }

    #[test]
    fn with_pick_records_fields_in_written_order() {
        let var = VariableDecl::new("m", TypeRef::named("Movie_Data")).with_pick(["title", "id"]);
        assert_eq!(var.pick, Some(vec!["title".to_string(), "id".to_string()]));
    }

    #[test]
    fn selection_kind_names() {
        assert_eq!(Selection::field("id").kind_name(), "field");
        let spread = Selection::FragmentSpread {
            name: "MovieParts".to_string(),
        };
        assert_eq!(spread.kind_name(), "fragment spread");
    }
}
