//! Boundary with the GraphQL parser and validator.
//!
//! Lexing, parsing, and GraphQL validation are delegated to `apollo-compiler`.
//! This module converts its output into the `crudkit-define` model and
//! back:
//!
//! 1. [`load_schema`] parses the user SDL into a [`Schema`].
//! 2. After augmentation, [`seal`] renders the schema to SDL and validates
//!    it, producing the schema operations are checked against.
//! 3. [`load_operations`] parses and validates an operation document
//!    against the sealed schema and converts each named operation.
//!
//! Parser and validator diagnostics are passed through as text in
//! [`GeneratorError::ParseError`] and [`GeneratorError::ValidationError`].

mod sdl;

pub use sdl::{PICK_DIRECTIVE_SDL, sdl_name, to_sdl};

use apollo_compiler::ast::{self, OperationType};
use apollo_compiler::executable;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::validation::Valid;
use apollo_compiler::ExecutableDocument;
use crudkit_define::{
    ArgumentDef, FieldDef, FieldSelection, Operation, OperationKind, Schema, Selection, TypeDef,
    TypeKind, TypeRef, VariableDecl,
};

use crate::errors::GeneratorError;

/// A schema accepted by the validator.
pub type SealedSchema = Valid<apollo_compiler::Schema>;

/// Name of the directive restricting a variable's fields.
pub const PICK_DIRECTIVE: &str = "pick";

/// Path reported for the rendered augmented schema in diagnostics.
const AUGMENTED_SCHEMA_PATH: &str = "augmented.graphql";

/// Parses user SDL into a [`Schema`].
///
/// Built-in scalars and introspection types are not copied; `Schema`
/// provides its own built-in scalars. Root types come from the `schema`
/// definition, defaulting to `Query` and `Mutation`, and are created empty
/// when not declared.
///
/// ## Errors
///
/// - [`GeneratorError::ParseError`] if the SDL does not parse or build.
/// - [`GeneratorError::UnsupportedDefinition`] for interfaces, unions,
///   enums, and custom scalars.
///
/// ## Examples
///
/// ```
/// use crudkit_gen::frontend::load_schema;
///
/// let schema = load_schema("type Movie { id: ID! title: String }", "schema.graphql").unwrap();
/// let movie = schema.get("Movie").unwrap();
/// assert_eq!(movie.fields[1].ty.to_string(), "String");
/// assert_eq!(schema.query.name, "Query");
/// ```
pub fn load_schema(source: &str, path: &str) -> Result<Schema, GeneratorError> {
    let parsed = apollo_compiler::Schema::builder()
        .adopt_orphan_extensions()
        .parse(source, path)
        .build()
        .map_err(|e| GeneratorError::ParseError(e.errors.to_string()))?;

    let query_root = root_name(parsed.schema_definition.query.as_ref(), "Query");
    let mutation_root = root_name(parsed.schema_definition.mutation.as_ref(), "Mutation");
    let mut schema = Schema::with_roots(&query_root, &mutation_root);

    for (name, extended) in &parsed.types {
        if extended.is_built_in() {
            continue;
        }

        let type_def = match extended {
            ExtendedType::Object(object) => TypeDef {
                name: name.to_string(),
                kind: TypeKind::Object,
                fields: object.fields.values().map(|field| field_def(field)).collect(),
                builtin: false,
                description: description(object.description.as_deref()),
            },
            ExtendedType::InputObject(input) => TypeDef {
                name: name.to_string(),
                kind: TypeKind::Input,
                fields: input
                    .fields
                    .values()
                    .map(|value| FieldDef {
                        name: value.name.to_string(),
                        ty: type_ref(&value.ty),
                        arguments: Vec::new(),
                        description: description(value.description.as_deref()),
                    })
                    .collect(),
                builtin: false,
                description: description(input.description.as_deref()),
            },
            other => {
                return Err(GeneratorError::UnsupportedDefinition {
                    name: name.to_string(),
                    kind: definition_kind(other).to_string(),
                });
            }
        };

        if type_def.name == query_root {
            schema.query = type_def;
        } else if type_def.name == mutation_root {
            schema.mutation = type_def;
        } else {
            schema.insert_type(type_def);
        }
    }

    Ok(schema)
}

/// Renders `schema` to SDL and validates it.
///
/// ## Errors
///
/// Returns [`GeneratorError::ValidationError`] with the validator's
/// diagnostics if the rendered schema is not valid GraphQL.
pub fn seal(schema: &Schema) -> Result<SealedSchema, GeneratorError> {
    apollo_compiler::Schema::parse_and_validate(to_sdl(schema), AUGMENTED_SCHEMA_PATH)
        .map_err(|e| GeneratorError::ValidationError(e.errors.to_string()))
}

/// Parses and validates an operation document against `sealed`, returning
/// its operations in document order.
///
/// ## Errors
///
/// - [`GeneratorError::ValidationError`] if the document fails to parse or
///   validate.
/// - [`GeneratorError::AnonymousOperation`] if an operation has no name.
/// - [`GeneratorError::UnsupportedDefinition`] for subscriptions.
pub fn load_operations(
    sealed: &SealedSchema,
    source: &str,
    path: &str,
) -> Result<Vec<Operation>, GeneratorError> {
    let document = ExecutableDocument::parse_and_validate(sealed, source, path)
        .map_err(|e| GeneratorError::ValidationError(e.errors.to_string()))?;

    if document.operations.anonymous.is_some() {
        return Err(GeneratorError::AnonymousOperation {
            path: path.to_string(),
        });
    }

    document
        .operations
        .named
        .values()
        .map(|operation| convert_operation(operation))
        .collect()
}

fn root_name(declared: Option<&apollo_compiler::schema::ComponentName>, default: &str) -> String {
    declared.map_or_else(|| default.to_string(), |root| root.name.to_string())
}

fn definition_kind(extended: &ExtendedType) -> &'static str {
    match extended {
        ExtendedType::Scalar(_) => "scalar",
        ExtendedType::Object(_) => "object",
        ExtendedType::Interface(_) => "interface",
        ExtendedType::Union(_) => "union",
        ExtendedType::Enum(_) => "enum",
        ExtendedType::InputObject(_) => "input object",
    }
}

fn description(text: Option<&str>) -> Option<String> {
    text.map(str::to_string)
}

fn field_def(field: &ast::FieldDefinition) -> FieldDef {
    FieldDef {
        name: field.name.to_string(),
        ty: type_ref(&field.ty),
        arguments: field
            .arguments
            .iter()
            .map(|arg| ArgumentDef {
                name: arg.name.to_string(),
                ty: type_ref(&arg.ty),
                description: description(arg.description.as_deref()),
            })
            .collect(),
        description: description(field.description.as_deref()),
    }
}

fn type_ref(ty: &ast::Type) -> TypeRef {
    match ty {
        ast::Type::Named(name) => TypeRef::named(name.as_str()),
        ast::Type::NonNullNamed(name) => TypeRef::named(name.as_str()).non_null(),
        ast::Type::List(element) => TypeRef::list(type_ref(element)),
        ast::Type::NonNullList(element) => TypeRef::list(type_ref(element)).non_null(),
    }
}

fn convert_operation(operation: &executable::Operation) -> Result<Operation, GeneratorError> {
    let name = operation
        .name
        .as_ref()
        .map(|name| name.to_string())
        .unwrap_or_default();

    let kind = match operation.operation_type {
        OperationType::Query => OperationKind::Query,
        OperationType::Mutation => OperationKind::Mutation,
        OperationType::Subscription => {
            return Err(GeneratorError::UnsupportedDefinition {
                name,
                kind: "subscription".to_string(),
            });
        }
    };

    let variables = operation
        .variables
        .iter()
        .map(|variable| {
            let mut decl = VariableDecl::new(variable.name.as_str(), type_ref(&variable.ty));
            if let Some(pick) = variable.directives.get(PICK_DIRECTIVE) {
                decl = decl.with_pick(picked_fields(pick));
            }
            decl
        })
        .collect();

    Ok(Operation {
        name,
        kind,
        variables,
        selections: convert_selections(&operation.selection_set),
    })
}

/// String values of the directive's `fields` argument.
///
/// A single string is accepted in place of a one-element list, as GraphQL
/// input coercion allows.
fn picked_fields(directive: &ast::Directive) -> Vec<String> {
    let Some(argument) = directive
        .arguments
        .iter()
        .find(|argument| argument.name.as_str() == "fields")
    else {
        return Vec::new();
    };

    match &*argument.value {
        ast::Value::List(items) => items
            .iter()
            .filter_map(|item| match &**item {
                ast::Value::String(value) => Some(value.to_string()),
                _ => None,
            })
            .collect(),
        ast::Value::String(value) => vec![value.to_string()],
        _ => Vec::new(),
    }
}

fn convert_selections(selection_set: &executable::SelectionSet) -> Vec<Selection> {
    selection_set
        .selections
        .iter()
        .map(|selection| match selection {
            executable::Selection::Field(field) => Selection::Field(FieldSelection {
                name: field.name.to_string(),
                alias: field.alias.as_ref().map(|alias| alias.to_string()),
                selections: convert_selections(&field.selection_set),
            }),
            executable::Selection::FragmentSpread(spread) => Selection::FragmentSpread {
                name: spread.fragment_name.to_string(),
            },
            executable::Selection::InlineFragment(inline) => Selection::InlineFragment {
                type_condition: inline.type_condition.as_ref().map(|ty| ty.to_string()),
            },
        })
        .collect()
}
