//! Field picker: which fields of a type take part in a generated class.
//!
//! A [`Projection`] describes the fields used from one type. Variables get
//! theirs from an optional `@pick(fields: [...])` directive; response fields
//! get theirs from the sub-selection written in the operation.
//!
//! Filtering always keeps the type's own field declaration order, never the
//! order of the pick list or of the selection set.
//!
//! ## Examples
//!
//! ```
//! use crudkit_define::{FieldDef, TypeDef, TypeRef, VariableDecl};
//! use crudkit_gen::picker::{filter_fields, pick_projection};
//!
//! let movie = TypeDef::object(
//!     "Movie_Data",
//!     vec![
//!         FieldDef::new("id", TypeRef::named("ID")),
//!         FieldDef::new("title", TypeRef::named("String")),
//!     ],
//! );
//! let var = VariableDecl::new("m", TypeRef::named("Movie_Data")).with_pick(["title"]);
//!
//! let projection = pick_projection(&var, &movie).unwrap();
//! let fields = filter_fields(&movie, &projection).unwrap();
//! assert_eq!(fields.len(), 1);
//! assert_eq!(fields[0].name, "title");
//! ```

use std::collections::BTreeMap;

use crudkit_define::{FieldDef, Schema, Selection, TypeDef, VariableDecl};

use crate::errors::GeneratorError;

/// The fields used from one type, recursively.
///
/// Two projections are equal when they select the same field names with
/// equal child projections; selection order does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Projection {
    /// Every declared field, and every field of every nested type.
    #[default]
    All,
    /// Only the named fields, each with its own child projection.
    Fields(BTreeMap<String, Projection>),
}

impl Projection {
    /// Returns `true` if `field` takes part.
    pub fn includes(&self, field: &str) -> bool {
        match self {
            Self::All => true,
            Self::Fields(fields) => fields.contains_key(field),
        }
    }

    /// The projection applied to the type of `field`.
    pub fn child(&self, field: &str) -> Projection {
        match self {
            Self::All => Self::All,
            Self::Fields(fields) => fields.get(field).cloned().unwrap_or_default(),
        }
    }

    /// Union of two projections of the same type.
    ///
    /// ```
    /// use crudkit_define::Selection;
    /// use crudkit_gen::picker::selection_projection;
    ///
    /// let id = selection_projection(&[Selection::field("id")], "Q.studio").unwrap();
    /// let name = selection_projection(&[Selection::field("name")], "Q.studio").unwrap();
    ///
    /// let both = id.merge(name);
    /// assert!(both.includes("id") && both.includes("name"));
    /// ```
    pub fn merge(self, other: Projection) -> Projection {
        match (self, other) {
            (Self::Fields(mut fields), Self::Fields(other)) => {
                for (name, child) in other {
                    let merged = match fields.remove(&name) {
                        Some(existing) => existing.merge(child),
                        None => child,
                    };
                    fields.insert(name, merged);
                }
                Self::Fields(fields)
            }
            _ => Self::All,
        }
    }

    /// Rewrites `self` so that equal field sets compare equal.
    ///
    /// A projection naming every declared field of `type_def`, each with a
    /// child projection that normalizes to [`Projection::All`], becomes
    /// [`Projection::All`]. Unknown fields are kept as-is for
    /// [`filter_fields`] to report.
    pub fn normalize(self, schema: &Schema, type_def: &TypeDef) -> Projection {
        let Self::Fields(fields) = self else {
            return Self::All;
        };

        let fields: BTreeMap<String, Projection> = fields
            .into_iter()
            .map(|(name, child)| {
                let child_def = type_def
                    .field(&name)
                    .and_then(|field| schema.get(field.ty.innermost_name()));
                let child = match child_def {
                    Some(child_def) => child.normalize(schema, child_def),
                    None => child,
                };
                (name, child)
            })
            .collect();

        let covers_type = type_def.fields.len() == fields.len()
            && type_def.fields.iter().all(|field| {
                fields
                    .get(&field.name)
                    .is_some_and(|child| *child == Self::All)
            });
        if covers_type {
            Self::All
        } else {
            Self::Fields(fields)
        }
    }
}

/// Projection for a variable, honoring its `@pick` directive.
///
/// Without a directive every field is used. Nested types reached from a
/// picked variable use all of their fields.
///
/// ## Errors
///
/// Returns [`GeneratorError::UnknownPickedField`] if the directive names a
/// field that `type_def` does not declare.
pub fn pick_projection(
    variable: &VariableDecl,
    type_def: &TypeDef,
) -> Result<Projection, GeneratorError> {
    let Some(picked) = &variable.pick else {
        return Ok(Projection::All);
    };

    let mut fields = BTreeMap::new();
    for name in picked {
        if !type_def.has_field(name) {
            return Err(GeneratorError::UnknownPickedField {
                variable: variable.name.clone(),
                field: name.clone(),
                type_name: type_def.name.clone(),
            });
        }
        fields.insert(name.clone(), Projection::All);
    }
    Ok(Projection::Fields(fields))
}

/// Projection for a response field, derived from its sub-selection.
///
/// An empty selection (a scalar field) projects [`Projection::All`]. A field
/// selected more than once gets the union of its sub-selections.
/// `location` names the enclosing operation and field path for errors.
///
/// ## Errors
///
/// Returns [`GeneratorError::UnsupportedSelection`] for fragment spreads,
/// inline fragments, and aliased fields below the top level.
pub fn selection_projection(
    selections: &[Selection],
    location: &str,
) -> Result<Projection, GeneratorError> {
    if selections.is_empty() {
        return Ok(Projection::All);
    }

    let mut fields = BTreeMap::new();
    for selection in selections {
        let Selection::Field(field) = selection else {
            return Err(GeneratorError::UnsupportedSelection {
                kind: selection.kind_name().to_string(),
                location: location.to_string(),
            });
        };

        let path = format!("{location}.{}", field.name);
        if field.alias.is_some() {
            return Err(GeneratorError::UnsupportedSelection {
                kind: "aliased nested field".to_string(),
                location: path,
            });
        }

        let child = selection_projection(&field.selections, &path)?;
        let merged = match fields.remove(&field.name) {
            Some(existing) => Projection::merge(existing, child),
            None => child,
        };
        fields.insert(field.name.clone(), merged);
    }
    Ok(Projection::Fields(fields))
}

/// Fields of `type_def` included by `projection`, in declaration order.
///
/// ## Errors
///
/// Returns [`GeneratorError::UnknownField`] if the projection names a field
/// `type_def` does not declare.
pub fn filter_fields<'a>(
    type_def: &'a TypeDef,
    projection: &Projection,
) -> Result<Vec<&'a FieldDef>, GeneratorError> {
    if let Projection::Fields(names) = projection
        && let Some(unknown) = names.keys().find(|name| !type_def.has_field(name))
    {
        return Err(GeneratorError::UnknownField {
            type_name: type_def.name.clone(),
            field: unknown.clone(),
        });
    }

    Ok(type_def
        .fields
        .iter()
        .filter(|field| projection.includes(&field.name))
        .collect())
}
