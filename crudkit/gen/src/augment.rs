//! Schema augmentation: synthesized CRUD and relation declarations.
//!
//! Given a user-authored schema, [`augment`] adds, for every user object
//! type `T` (with `t = lowercase(T)`):
//!
//! - an input type `T_Data` mirroring `T`'s fields, relation fields included
//! - mutation fields `t_insert`, `t_delete`, `t_update`
//! - query fields `t(...)` and `pluralize(t)(...)` with one optional filter
//!   argument per field
//! - for every non-list field of `T` referencing another object type `R`, a
//!   relation field `pluralize(t)_as_<r>: [T!]!` on `R`
//!
//! plus the three result-marker scalars returned by the mutation fields.
//!
//! ## Ordering
//!
//! The set of types to augment is snapshotted before anything is added, so
//! synthesized types never receive synthesized declarations of their own.
//! Relation fields are collected across all owners and appended only after
//! the scan, so they never trigger further relation fields. Input types and
//! query filters are derived afterwards and so carry the relation fields
//! too. Every list the engine appends to follows type and field declaration
//! order.
//!
//! ## Examples
//!
//! ```
//! use crudkit_define::{FieldDef, Schema, TypeDef, TypeRef};
//! use crudkit_gen::augment::augment;
//!
//! let mut schema = Schema::new();
//! schema.insert_type(TypeDef::object(
//!     "Movie",
//!     vec![FieldDef::new("title", TypeRef::named("String").non_null())],
//! ));
//!
//! let augmented = augment(schema).unwrap();
//! assert!(augmented.schema.get("Movie_Data").is_some());
//! assert!(augmented.schema.mutation.has_field("movie_insert"));
//! assert!(augmented.schema.query.has_field("movies"));
//! ```

use std::collections::HashSet;
use std::fmt;

use crudkit_define::scalar::{
    DELETE_RESULT_MARKER, INSERT_RESULT_MARKER, RESULT_MARKERS, UPDATE_RESULT_MARKER,
};
use crudkit_define::{ArgumentDef, FieldDef, Schema, TypeDef, TypeKind, TypeRef};

use crate::errors::GeneratorError;
use crate::inflection::{lowercase, pluralize};

/// Suffix of synthesized input types.
pub const INPUT_TYPE_SUFFIX: &str = "_Data";

/// One declaration added to the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaChange {
    MarkerType { name: String },
    RelationField { type_name: String, field: String },
    InputType { name: String },
    MutationField { name: String },
    QueryField { name: String },
}

impl fmt::Display for SchemaChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MarkerType { name } => write!(f, "marker scalar {name}"),
            Self::RelationField { type_name, field } => {
                write!(f, "relation field {type_name}.{field}")
            }
            Self::InputType { name } => write!(f, "input type {name}"),
            Self::MutationField { name } => write!(f, "mutation field {name}"),
            Self::QueryField { name } => write!(f, "query field {name}"),
        }
    }
}

/// The augmented schema plus every change made to it, in order.
#[derive(Debug, Clone)]
pub struct AugmentedSchema {
    pub schema: Schema,
    pub changes: Vec<SchemaChange>,
}

/// Pairs an original type with the name of its synthesized input type.
///
/// `original` is a copy taken after relation fields were appended.
#[derive(Debug, Clone)]
struct SynthesizedInputTypeInfo {
    original: TypeDef,
    input_type_name: String,
}

/// Augments `schema` with synthesized input types, CRUD fields, and
/// relation fields.
///
/// The schema is consumed; on failure nothing is returned, so a partially
/// augmented schema can never escape.
///
/// ## Errors
///
/// - [`GeneratorError::SchemaConsistency`] if a field or argument of a user
///   type references a type that is not in the schema.
/// - [`GeneratorError::NamingCollision`] if a synthesized type or field name
///   is already declared by the user.
pub fn augment(mut schema: Schema) -> Result<AugmentedSchema, GeneratorError> {
    let originals = snapshot_original_types(&schema);
    check_references(&schema, &originals)?;

    let mut changes = Vec::new();

    add_result_markers(&mut schema, &mut changes);
    add_relation_fields(&mut schema, &originals, &mut changes)?;
    let inputs = add_input_types(&mut schema, &originals, &mut changes)?;
    add_mutation_fields(&mut schema, &inputs, &mut changes)?;
    add_query_fields(&mut schema, &inputs, &mut changes)?;

    Ok(AugmentedSchema { schema, changes })
}

/// Copies every user-declared object type, in declaration order.
fn snapshot_original_types(schema: &Schema) -> Vec<TypeDef> {
    schema
        .types
        .values()
        .filter(|ty| !ty.builtin && ty.kind == TypeKind::Object)
        .cloned()
        .collect()
}

fn check_references(schema: &Schema, originals: &[TypeDef]) -> Result<(), GeneratorError> {
    for type_def in originals {
        for field in &type_def.fields {
            let owner = format!("field \"{}.{}\"", type_def.name, field.name);
            lookup(schema, field.ty.innermost_name(), &owner)?;
            for arg in &field.arguments {
                let owner = format!(
                    "argument \"{}.{}({})\"",
                    type_def.name, field.name, arg.name
                );
                lookup(schema, arg.ty.innermost_name(), &owner)?;
            }
        }
    }
    Ok(())
}

fn lookup<'a>(schema: &'a Schema, name: &str, owner: &str) -> Result<&'a TypeDef, GeneratorError> {
    schema
        .get(name)
        .ok_or_else(|| GeneratorError::missing_type(name, owner))
}

fn add_result_markers(schema: &mut Schema, changes: &mut Vec<SchemaChange>) {
    for marker in RESULT_MARKERS {
        schema.insert_type(TypeDef::builtin_scalar(marker));
        changes.push(SchemaChange::MarkerType {
            name: marker.to_string(),
        });
    }
}

fn add_relation_fields(
    schema: &mut Schema,
    originals: &[TypeDef],
    changes: &mut Vec<SchemaChange>,
) -> Result<(), GeneratorError> {
    // (referenced type, relation field), appended only once the scan is done
    let mut relation_fields: Vec<(String, FieldDef)> = Vec::new();

    for owner in originals {
        for field in &owner.fields {
            // List-typed relations are not supported.
            if field.ty.is_list() {
                continue;
            }

            let owner_name = format!("field \"{}.{}\"", owner.name, field.name);
            let referenced = lookup(schema, field.ty.innermost_name(), &owner_name)?;
            if referenced.builtin || referenced.kind != TypeKind::Object {
                continue;
            }

            let name = relation_field_name(&owner.name, &referenced.name);
            let ty = TypeRef::list(TypeRef::named(&owner.name).non_null()).non_null();
            relation_fields.push((referenced.name.clone(), FieldDef::new(name, ty)));
        }
    }

    let mut synthesized: HashSet<(String, String)> = HashSet::new();
    for (type_name, field) in relation_fields {
        let key = (type_name.clone(), field.name.clone());
        if synthesized.contains(&key) {
            continue;
        }

        let target = schema
            .get_mut(&type_name)
            .ok_or_else(|| GeneratorError::missing_type(&type_name, "relation field"))?;
        if target.has_field(&field.name) {
            return Err(GeneratorError::NamingCollision {
                kind: "relation field".to_string(),
                name: field.name,
                owner: format!("type \"{type_name}\""),
            });
        }

        changes.push(SchemaChange::RelationField {
            type_name: type_name.clone(),
            field: field.name.clone(),
        });
        target.fields.push(field);
        synthesized.insert(key);
    }

    Ok(())
}

/// `pluralize(lowercase(owner)) + "_as_" + lowercase(referenced)`.
///
/// ```
/// use crudkit_gen::augment::relation_field_name;
///
/// assert_eq!(relation_field_name("Movie", "Studio"), "movies_as_studio");
/// ```
pub fn relation_field_name(owner: &str, referenced: &str) -> String {
    format!(
        "{}_as_{}",
        pluralize(&lowercase(owner)),
        lowercase(referenced)
    )
}

fn add_input_types(
    schema: &mut Schema,
    originals: &[TypeDef],
    changes: &mut Vec<SchemaChange>,
) -> Result<Vec<SynthesizedInputTypeInfo>, GeneratorError> {
    let mut inputs = Vec::with_capacity(originals.len());
    let object_names: HashSet<&str> = originals.iter().map(|ty| ty.name.as_str()).collect();

    for snapshot in originals {
        // Re-read the type so the copy includes its relation fields.
        let original = lookup(schema, &snapshot.name, "input type synthesis")?.clone();
        let input_type_name = format!("{}{INPUT_TYPE_SUFFIX}", original.name);
        if schema.get(&input_type_name).is_some() {
            return Err(GeneratorError::NamingCollision {
                kind: "input type".to_string(),
                name: input_type_name,
                owner: "the schema".to_string(),
            });
        }

        // Input types may only reference input types, so object-typed
        // fields point at the object's own `_Data` counterpart.
        let fields = original
            .fields
            .iter()
            .map(|field| {
                let leaf = field.ty.innermost_name();
                let mut field = field.clone();
                if object_names.contains(leaf) {
                    field.ty = field
                        .ty
                        .with_innermost_name(&format!("{leaf}{INPUT_TYPE_SUFFIX}"));
                }
                field
            })
            .collect();

        schema.insert_type(TypeDef {
            name: input_type_name.clone(),
            kind: TypeKind::Input,
            fields,
            builtin: false,
            description: original.description.clone(),
        });
        changes.push(SchemaChange::InputType {
            name: input_type_name.clone(),
        });

        inputs.push(SynthesizedInputTypeInfo {
            original,
            input_type_name,
        });
    }

    Ok(inputs)
}

fn add_mutation_fields(
    schema: &mut Schema,
    inputs: &[SynthesizedInputTypeInfo],
    changes: &mut Vec<SchemaChange>,
) -> Result<(), GeneratorError> {
    for input in inputs {
        let prefix = lowercase(&input.original.name);
        let data = TypeRef::named(&input.input_type_name);
        let id = TypeRef::named("String");

        let fields = [
            FieldDef::new(
                format!("{prefix}_insert"),
                TypeRef::named(INSERT_RESULT_MARKER).non_null(),
            )
            .with_arguments(vec![ArgumentDef::new("data", data.clone().non_null())]),
            FieldDef::new(
                format!("{prefix}_delete"),
                TypeRef::named(DELETE_RESULT_MARKER),
            )
            .with_arguments(vec![ArgumentDef::new("id", id.clone())]),
            FieldDef::new(
                format!("{prefix}_update"),
                TypeRef::named(UPDATE_RESULT_MARKER).non_null(),
            )
            .with_arguments(vec![
                ArgumentDef::new("id", id),
                ArgumentDef::new("data", data),
            ]),
        ];

        for field in fields {
            changes.push(SchemaChange::MutationField {
                name: field.name.clone(),
            });
            push_root_field(&mut schema.mutation, field)?;
        }
    }
    Ok(())
}

fn add_query_fields(
    schema: &mut Schema,
    inputs: &[SynthesizedInputTypeInfo],
    changes: &mut Vec<SchemaChange>,
) -> Result<(), GeneratorError> {
    for input in inputs {
        let original = &input.original;
        let arguments = query_field_arguments(schema, original);
        let singular = lowercase(&original.name);
        let plural = pluralize(&singular);

        let fields = [
            FieldDef::new(singular, TypeRef::named(&original.name).non_null())
                .with_arguments(arguments.clone()),
            FieldDef::new(
                plural,
                TypeRef::list(TypeRef::named(&original.name).non_null()).non_null(),
            )
            .with_arguments(arguments),
        ];

        for field in fields {
            changes.push(SchemaChange::QueryField {
                name: field.name.clone(),
            });
            push_root_field(&mut schema.query, field)?;
        }
    }
    Ok(())
}

/// One optional filter argument per field, in field order.
///
/// Fields referencing object types filter by the referenced entity's key,
/// so their argument leaf type becomes `String`.
fn query_field_arguments(schema: &Schema, type_def: &TypeDef) -> Vec<ArgumentDef> {
    type_def
        .fields
        .iter()
        .map(|field| {
            let leaf_is_scalar = schema
                .get(field.ty.innermost_name())
                .is_some_and(TypeDef::is_scalar);
            let ty = if leaf_is_scalar {
                field.ty.clone()
            } else {
                field.ty.with_innermost_name("String")
            };
            ArgumentDef {
                name: field.name.clone(),
                ty: ty.with_nullable(true),
                description: field.description.clone(),
            }
        })
        .collect()
}

fn push_root_field(root: &mut TypeDef, field: FieldDef) -> Result<(), GeneratorError> {
    if root.has_field(&field.name) {
        return Err(GeneratorError::NamingCollision {
            kind: format!("{} field", lowercase(&root.name)),
            name: field.name,
            owner: format!("type \"{}\"", root.name),
        });
    }
    root.fields.push(field);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::movie_schema;

    fn field_names(type_def: &TypeDef) -> Vec<&str> {
        type_def.fields.iter().map(|f| f.name.as_str()).collect()
    }

    // === input types ===

    #[test]
    fn input_types_mirror_declared_fields() {
        let augmented = augment(movie_schema()).unwrap();
        let movie_data = augmented.schema.get("Movie_Data").unwrap();

        assert_eq!(movie_data.kind, TypeKind::Input);
        assert!(!movie_data.builtin);
        assert_eq!(field_names(movie_data), vec!["id", "title", "studio"]);
        assert_eq!(
            movie_data.field("studio").unwrap().ty.to_string(),
            "Studio_Data"
        );
        assert_eq!(movie_data.field("title").unwrap().ty.to_string(), "String!");
    }

    #[test]
    fn input_types_include_relation_fields() {
        let augmented = augment(movie_schema()).unwrap();
        let studio = augmented.schema.get("Studio").unwrap();
        let studio_data = augmented.schema.get("Studio_Data").unwrap();

        assert_eq!(field_names(studio_data), field_names(studio));
        assert_eq!(
            studio_data.field("movies_as_studio").unwrap().ty.to_string(),
            "[Movie_Data!]!"
        );
    }

    #[test]
    fn synthesized_types_are_not_augmented_again() {
        let augmented = augment(movie_schema()).unwrap();
        assert!(augmented.schema.get("Movie_Data_Data").is_none());
        assert!(!augmented.schema.query.has_field("movie_data"));
    }

    // === mutation fields ===

    #[test]
    fn mutation_fields_are_added_per_type_in_order() {
        let augmented = augment(movie_schema()).unwrap();
        assert_eq!(
            field_names(&augmented.schema.mutation),
            vec![
                "movie_insert",
                "movie_delete",
                "movie_update",
                "studio_insert",
                "studio_delete",
                "studio_update",
            ]
        );
    }

    #[test]
    fn mutation_field_signatures() {
        let augmented = augment(movie_schema()).unwrap();
        let mutation = &augmented.schema.mutation;

        let insert = mutation.field("movie_insert").unwrap();
        assert_eq!(insert.ty.to_string(), "sdk:MutationRef.InsertData!");
        assert_eq!(insert.arguments[0].name, "data");
        assert_eq!(insert.arguments[0].ty.to_string(), "Movie_Data!");

        let delete = mutation.field("movie_delete").unwrap();
        assert_eq!(delete.ty.to_string(), "sdk:MutationRef.DeleteData");
        assert_eq!(delete.arguments[0].ty.to_string(), "String");

        let update = mutation.field("movie_update").unwrap();
        assert_eq!(update.ty.to_string(), "sdk:MutationRef.UpdateData!");
        let args: Vec<_> = update.arguments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(args, vec!["id", "data"]);
    }

    #[test]
    fn result_markers_are_builtin_scalars() {
        let augmented = augment(movie_schema()).unwrap();
        for marker in RESULT_MARKERS {
            let ty = augmented.schema.get(marker).unwrap();
            assert!(ty.builtin);
            assert!(ty.is_scalar());
        }
    }

    // === query fields ===

    #[test]
    fn query_fields_take_optional_filter_per_field() {
        let augmented = augment(movie_schema()).unwrap();
        let movie = augmented.schema.query.field("movie").unwrap();

        assert_eq!(movie.ty.to_string(), "Movie!");
        let args: Vec<_> = movie
            .arguments
            .iter()
            .map(|a| format!("{}: {}", a.name, a.ty))
            .collect();
        assert_eq!(args, vec!["id: ID", "title: String", "studio: String"]);

        let movies = augmented.schema.query.field("movies").unwrap();
        assert_eq!(movies.ty.to_string(), "[Movie!]!");
        assert_eq!(movies.arguments, movie.arguments);
    }

    #[test]
    fn query_fields_filter_on_relation_fields() {
        let augmented = augment(movie_schema()).unwrap();
        let studio = augmented.schema.query.field("studio").unwrap();
        let args: Vec<_> = studio
            .arguments
            .iter()
            .map(|a| format!("{}: {}", a.name, a.ty))
            .collect();
        assert_eq!(
            args,
            vec!["id: ID", "name: String", "movies_as_studio: [String!]"]
        );
    }

    // === relation fields ===

    #[test]
    fn relation_field_added_to_referenced_type() {
        let augmented = augment(movie_schema()).unwrap();
        let studio = augmented.schema.get("Studio").unwrap();
        let relation = studio.field("movies_as_studio").unwrap();
        assert_eq!(relation.ty.to_string(), "[Movie!]!");
        assert!(!augmented.schema.get("Movie").unwrap().has_field("studios_as_movie"));
    }

    #[test]
    fn list_fields_do_not_produce_relations() {
        let mut schema = movie_schema();
        schema.get_mut("Studio").unwrap().fields.push(FieldDef::new(
            "movies",
            TypeRef::list(TypeRef::named("Movie").non_null()),
        ));
        let augmented = augment(schema).unwrap();
        assert!(!augmented.schema.get("Movie").unwrap().has_field("studios_as_movie"));
    }

    #[test]
    fn duplicate_relation_fields_are_added_once() {
        let mut schema = movie_schema();
        schema
            .get_mut("Movie")
            .unwrap()
            .fields
            .push(FieldDef::new("distributor", TypeRef::named("Studio")));
        let augmented = augment(schema).unwrap();
        let studio = augmented.schema.get("Studio").unwrap();
        let count = studio
            .fields
            .iter()
            .filter(|f| f.name == "movies_as_studio")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn relation_pass_is_order_independent() {
        let forward = augment(movie_schema()).unwrap();

        let mut reversed = Schema::new();
        let original = movie_schema();
        for name in original.user_type_names().iter().rev() {
            reversed.insert_type(original.get(name).unwrap().clone());
        }
        let backward = augment(reversed).unwrap();

        assert_eq!(
            forward.schema.get("Studio").unwrap().fields,
            backward.schema.get("Studio").unwrap().fields
        );
    }

    // === failures ===

    #[test]
    fn missing_field_type_is_reported_with_owner() {
        let mut schema = Schema::new();
        schema.insert_type(TypeDef::object(
            "Movie",
            vec![FieldDef::new("studio", TypeRef::named("Studio"))],
        ));

        let err = augment(schema).unwrap_err();
        match err {
            GeneratorError::SchemaConsistency { type_name, owner } => {
                assert_eq!(type_name, "Studio");
                assert!(owner.contains("Movie.studio"));
            }
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn existing_input_type_name_is_a_collision() {
        let mut schema = movie_schema();
        schema.insert_type(TypeDef::object("Movie_Data", vec![]));
        let err = augment(schema).unwrap_err();
        assert!(matches!(err, GeneratorError::NamingCollision { .. }));
    }

    #[test]
    fn user_query_field_clash_is_a_collision() {
        let mut schema = movie_schema();
        schema
            .query
            .fields
            .push(FieldDef::new("movies", TypeRef::named("Int")));
        let err = augment(schema).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::NamingCollision { ref name, .. } if name == "movies"
        ));
    }

    // === report ===

    #[test]
    fn changes_are_reported_in_application_order() {
        let augmented = augment(movie_schema()).unwrap();
        let first_kinds: Vec<String> = augmented
            .changes
            .iter()
            .take(5)
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            first_kinds,
            vec![
                "marker scalar sdk:MutationRef.InsertData",
                "marker scalar sdk:MutationRef.UpdateData",
                "marker scalar sdk:MutationRef.DeleteData",
                "relation field Studio.movies_as_studio",
                "input type Movie_Data",
            ]
        );
    }
}
