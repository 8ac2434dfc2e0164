//! Nested class discovery.
//!
//! Classes are emitted in breadth-first order starting from the non-scalar
//! leaf types of the top-level definitions. Each queued type carries the
//! chain of singular fields that led to it, so a type that contains itself
//! without a list in between fails with [`GeneratorError::CyclicType`]
//! instead of looping. A type reached again any other way is emitted once,
//! provided it is used with the same projection both times. Projections are
//! normalized against the schema before they are compared.
//!
//! A list field leading back to a type that already has a class is governed
//! by [`ListRevisit`].

use std::collections::VecDeque;

use crudkit_define::model::mark_last_parameter;
use crudkit_define::{GeneratedClass, Schema, TypeDef};
use indexmap::IndexMap;

use super::types::{VariableDefinition, parameter, resolve};
use crate::errors::GeneratorError;
use crate::picker::{Projection, filter_fields};

/// Treatment of a list field whose element type already has a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListRevisit {
    /// The list holds the existing class, whatever its projection.
    Reuse,
    /// The list must project the same fields as the existing class.
    Match,
}

struct Pending<'s> {
    definition: &'s TypeDef,
    projection: Projection,
    /// Type names reached through singular fields, ending at `definition`.
    path: Vec<String>,
}

/// Builds one class per distinct non-scalar type reachable from `roots`.
///
/// ## Errors
///
/// - [`GeneratorError::CyclicType`] if a type contains itself through a
///   chain of singular non-scalar fields.
/// - [`GeneratorError::ConflictingProjection`] if one type is used with two
///   different projections, except through a list under
///   [`ListRevisit::Reuse`].
/// - [`GeneratorError::SchemaConsistency`] if a field's type is missing.
pub(crate) fn nested_classes(
    schema: &Schema,
    operation: &str,
    roots: &[VariableDefinition<'_>],
    list_revisit: ListRevisit,
) -> Result<Vec<GeneratedClass>, GeneratorError> {
    let mut seen: IndexMap<String, Projection> = IndexMap::new();
    let mut queue: VecDeque<Pending<'_>> = VecDeque::new();

    for root in roots.iter().filter(|root| !root.is_scalar()) {
        let projection = root.projection.clone().normalize(schema, root.definition);
        if claim(&mut seen, operation, root.definition, &projection)? {
            queue.push_back(Pending {
                definition: root.definition,
                projection,
                path: vec![root.definition.name.clone()],
            });
        }
    }

    let mut classes = Vec::new();
    while let Some(pending) = queue.pop_front() {
        let fields = filter_fields(pending.definition, &pending.projection)?;

        let mut parameters = Vec::with_capacity(fields.len());
        for field in fields {
            parameters.push(parameter(&field.name, &field.ty));

            let child = resolve(schema, &field.ty, || {
                format!("field \"{}.{}\"", pending.definition.name, field.name)
            })?;
            if child.is_scalar() {
                continue;
            }

            let path = if field.ty.is_list() {
                if list_revisit == ListRevisit::Reuse && seen.contains_key(&child.name) {
                    continue;
                }
                vec![child.name.clone()]
            } else {
                if let Some(start) = pending.path.iter().position(|name| *name == child.name) {
                    let mut cycle = pending.path[start..].to_vec();
                    cycle.push(child.name.clone());
                    return Err(GeneratorError::CyclicType {
                        cycle: cycle.join(" -> "),
                    });
                }
                let mut path = pending.path.clone();
                path.push(child.name.clone());
                path
            };

            // children of a normalized projection are normalized
            let projection = pending.projection.child(&field.name);
            if claim(&mut seen, operation, child, &projection)? {
                queue.push_back(Pending {
                    definition: child,
                    projection,
                    path,
                });
            }
        }

        mark_last_parameter(&mut parameters);
        classes.push(GeneratedClass {
            name: pending.definition.name.clone(),
            constructor_parameters: parameters,
            nested_classes: Vec::new(),
            secondary_constructors: Vec::new(),
        });
    }

    Ok(classes)
}

/// Records `definition` as queued. Returns `false` if it already was.
fn claim(
    seen: &mut IndexMap<String, Projection>,
    operation: &str,
    definition: &TypeDef,
    projection: &Projection,
) -> Result<bool, GeneratorError> {
    match seen.get(&definition.name) {
        Some(existing) if existing == projection => Ok(false),
        Some(_) => Err(GeneratorError::ConflictingProjection {
            operation: operation.to_string(),
            type_name: definition.name.clone(),
        }),
        None => {
            seen.insert(definition.name.clone(), projection.clone());
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::{pick_projection, selection_projection};
    use crate::test_utils::augmented_movie_schema;
    use crudkit_define::{FieldDef, Selection, TypeRef, VariableDecl};

    fn root<'s>(
        schema: &'s Schema,
        name: &str,
        ty: &str,
        projection: Projection,
    ) -> VariableDefinition<'s> {
        VariableDefinition {
            name: name.to_string(),
            ty: TypeRef::named(ty),
            definition: schema.get(ty).unwrap(),
            projection,
        }
    }

    fn class_names(classes: &[GeneratedClass]) -> Vec<&str> {
        classes.iter().map(|c| c.name.as_str()).collect()
    }

    fn param_names(class: &GeneratedClass) -> Vec<&str> {
        class
            .constructor_parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect()
    }

    #[test]
    fn scalar_roots_produce_no_classes() {
        let schema = augmented_movie_schema();
        let roots = [root(&schema, "id", "String", Projection::All)];
        assert!(nested_classes(&schema, "Op", &roots, ListRevisit::Reuse).unwrap().is_empty());
    }

    #[test]
    fn input_types_expand_breadth_first() {
        let schema = augmented_movie_schema();
        let roots = [root(&schema, "m", "Movie_Data", Projection::All)];
        let classes = nested_classes(&schema, "Op", &roots, ListRevisit::Reuse).unwrap();

        assert_eq!(class_names(&classes), vec!["Movie_Data", "Studio_Data"]);
        assert_eq!(param_names(&classes[0]), vec!["id", "title", "studio"]);
        assert_eq!(
            classes[0].constructor_parameters[2].ty.to_string(),
            "Studio_Data?"
        );
        assert!(classes[0].constructor_parameters[2].is_last);
    }

    #[test]
    fn response_projection_restricts_class() {
        let schema = augmented_movie_schema();
        let projection = selection_projection(
            &[Selection::field("id"), Selection::field("title")],
            "GetMovie.movie",
        )
        .unwrap();
        let roots = [root(&schema, "movie", "Movie", projection)];
        let classes = nested_classes(&schema, "GetMovie", &roots, ListRevisit::Match).unwrap();

        assert_eq!(class_names(&classes), vec!["Movie"]);
        assert_eq!(param_names(&classes[0]), vec!["id", "title"]);
    }

    #[test]
    fn type_reached_twice_is_emitted_once() {
        let schema = augmented_movie_schema();
        let roots = [
            root(&schema, "a", "Movie_Data", Projection::All),
            root(&schema, "b", "Studio_Data", Projection::All),
        ];
        let classes = nested_classes(&schema, "Op", &roots, ListRevisit::Reuse).unwrap();
        assert_eq!(class_names(&classes), vec!["Movie_Data", "Studio_Data"]);
    }

    #[test]
    fn same_type_with_different_projections_conflicts() {
        let schema = augmented_movie_schema();
        let only_id = selection_projection(&[Selection::field("id")], "Op.a").unwrap();
        let only_title = selection_projection(&[Selection::field("title")], "Op.b").unwrap();
        let roots = [
            root(&schema, "a", "Movie", only_id),
            root(&schema, "b", "Movie", only_title),
        ];
        let err = nested_classes(&schema, "Op", &roots, ListRevisit::Match).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::ConflictingProjection { ref type_name, .. } if type_name == "Movie"
        ));
    }

    #[test]
    fn self_referencing_type_is_a_cycle() {
        let mut schema = Schema::new();
        schema.insert_type(TypeDef::object(
            "Node",
            vec![
                FieldDef::new("id", TypeRef::named("ID")),
                FieldDef::new("next", TypeRef::named("Node")),
            ],
        ));
        let roots = [root(&schema, "n", "Node", Projection::All)];
        let err = nested_classes(&schema, "Op", &roots, ListRevisit::Reuse).unwrap_err();
        match err {
            GeneratorError::CyclicType { cycle } => assert_eq!(cycle, "Node -> Node"),
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn singular_cycle_through_two_types_is_reported() {
        let mut schema = Schema::new();
        schema.insert_type(TypeDef::object(
            "Movie",
            vec![FieldDef::new("sequel", TypeRef::named("Sequel"))],
        ));
        schema.insert_type(TypeDef::object(
            "Sequel",
            vec![FieldDef::new("movie", TypeRef::named("Movie"))],
        ));
        let roots = [root(&schema, "movie", "Movie", Projection::All)];
        let err = nested_classes(&schema, "Op", &roots, ListRevisit::Reuse).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cyclic type reference: Movie -> Sequel -> Movie"
        );
    }

    #[test]
    fn list_back_to_owner_reuses_the_class() {
        let schema = augmented_movie_schema();
        let roots = [root(&schema, "m", "Movie_Data", Projection::All)];
        let classes = nested_classes(&schema, "Op", &roots, ListRevisit::Reuse).unwrap();

        assert_eq!(class_names(&classes), vec!["Movie_Data", "Studio_Data"]);
        assert_eq!(
            param_names(&classes[1]),
            vec!["id", "name", "movies_as_studio"]
        );
    }

    #[test]
    fn picked_root_is_reused_by_list_back_reference() {
        let schema = augmented_movie_schema();
        let picked = VariableDecl::new("m", TypeRef::named("Movie_Data"))
            .with_pick(["title", "studio"]);
        let movie_data = schema.get("Movie_Data").unwrap();
        let roots = [root(
            &schema,
            "m",
            "Movie_Data",
            pick_projection(&picked, movie_data).unwrap(),
        )];

        let classes = nested_classes(&schema, "Op", &roots, ListRevisit::Reuse).unwrap();
        assert_eq!(class_names(&classes), vec!["Movie_Data", "Studio_Data"]);
        assert_eq!(param_names(&classes[0]), vec!["title", "studio"]);
    }

    #[test]
    fn list_back_to_owner_with_other_fields_conflicts() {
        let schema = augmented_movie_schema();
        let projection = selection_projection(
            &[Selection::field_with(
                "studio",
                vec![Selection::field_with(
                    "movies_as_studio",
                    vec![Selection::field("title")],
                )],
            )],
            "Op.movie",
        )
        .unwrap();
        let roots = [root(&schema, "movie", "Movie", projection)];
        let err = nested_classes(&schema, "Op", &roots, ListRevisit::Match).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::ConflictingProjection { ref type_name, .. } if type_name == "Movie"
        ));
    }

    #[test]
    fn full_pick_matches_unpicked_use() {
        let schema = augmented_movie_schema();
        let everything = VariableDecl::new("a", TypeRef::named("Movie_Data"))
            .with_pick(["id", "title", "studio"]);
        let movie_data = schema.get("Movie_Data").unwrap();
        let roots = [
            root(
                &schema,
                "a",
                "Movie_Data",
                pick_projection(&everything, movie_data).unwrap(),
            ),
            root(&schema, "b", "Movie_Data", Projection::All),
        ];

        let classes = nested_classes(&schema, "Op", &roots, ListRevisit::Reuse).unwrap();
        assert_eq!(class_names(&classes), vec!["Movie_Data", "Studio_Data"]);
    }
}
