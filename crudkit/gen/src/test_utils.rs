//! Shared test utilities for crudkit-gen tests.
//!
//! Fixtures are built directly from the `crudkit-define` types so unit tests
//! do not depend on the GraphQL frontend.

use crudkit_define::{
    FieldDef, Operation, OperationKind, Schema, Selection, TypeDef, TypeRef, VariableDecl,
};
use proc_macro2::TokenStream;

use crate::augment::augment;

/// The two-type schema used throughout the tests:
///
/// ```graphql
/// type Movie { id: ID!, title: String!, studio: Studio }
/// type Studio { id: ID!, name: String! }
/// ```
pub fn movie_schema() -> Schema {
    let mut schema = Schema::new();
    schema.insert_type(TypeDef::object(
        "Movie",
        vec![
            FieldDef::new("id", TypeRef::named("ID").non_null()),
            FieldDef::new("title", TypeRef::named("String").non_null()),
            FieldDef::new("studio", TypeRef::named("Studio")),
        ],
    ));
    schema.insert_type(TypeDef::object(
        "Studio",
        vec![
            FieldDef::new("id", TypeRef::named("ID").non_null()),
            FieldDef::new("name", TypeRef::named("String").non_null()),
        ],
    ));
    schema
}

/// [`movie_schema`] after augmentation.
pub fn augmented_movie_schema() -> Schema {
    match augment(movie_schema()) {
        Ok(augmented) => augmented.schema,
        Err(e) => panic!("fixture schema failed to augment: {e}"),
    }
}

/// Creates a named operation.
pub fn make_operation(
    name: &str,
    kind: OperationKind,
    variables: Vec<VariableDecl>,
    selections: Vec<Selection>,
) -> Operation {
    Operation {
        name: name.to_string(),
        kind,
        variables,
        selections,
    }
}

/// `mutation InsertMovie($m: Movie_Data @pick(...)) { movie_insert(data: $m) }`
pub fn insert_movie_operation(pick: Option<&[&str]>) -> Operation {
    let mut variable = VariableDecl::new("m", TypeRef::named("Movie_Data"));
    if let Some(fields) = pick {
        variable = variable.with_pick(fields.iter().copied());
    }
    make_operation(
        "InsertMovie",
        OperationKind::Mutation,
        vec![variable],
        vec![Selection::field("movie_insert")],
    )
}

/// `query GetMovie($id: String) { movie(id: $id) { id title } }`
pub fn get_movie_operation() -> Operation {
    make_operation(
        "GetMovie",
        OperationKind::Query,
        vec![VariableDecl::new("id", TypeRef::named("String"))],
        vec![Selection::field_with(
            "movie",
            vec![Selection::field("id"), Selection::field("title")],
        )],
    )
}

/// Formats generated code using prettyplease.
///
/// ## Errors
///
/// Returns an error string if the code fails to parse.
pub fn format_generated_code(tokens: &TokenStream) -> Result<String, String> {
    let file = syn::parse2::<syn::File>(tokens.clone()).map_err(|e| e.to_string())?;
    Ok(prettyplease::unparse(&file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_schema_declares_two_user_types() {
        let schema = movie_schema();
        assert_eq!(
            schema.user_type_names(),
            vec!["Movie".to_string(), "Studio".to_string()]
        );
    }

    #[test]
    fn insert_movie_operation_applies_pick() {
        let op = insert_movie_operation(Some(&["title"]));
        assert_eq!(op.variables[0].pick, Some(vec!["title".to_string()]));
        assert_eq!(insert_movie_operation(None).variables[0].pick, None);
    }
}
