//! Operation model builder.
//!
//! Turns one validated [`Operation`] plus the augmented [`Schema`] into a
//! [`GeneratedClassModel`]:
//!
//! - a variables class `<Op>Variables` with one parameter per declared
//!   variable, nested classes for every non-scalar type the variables
//!   reach, and a flattened secondary constructor when any variable is an
//!   object
//! - a response class `<Op>Data` with one parameter per top-level selected
//!   field and nested classes restricted to the selected sub-fields
//! - an operation-level convenience function taking the flattened
//!   parameters and rebuilding the variables class
//!
//! Either class is absent when the operation declares no variables or
//! selects nothing.
//!
//! ## Examples
//!
//! ```
//! use crudkit_define::{Operation, OperationKind, Selection, VariableDecl, TypeRef};
//! use crudkit_define::{FieldDef, Schema, TypeDef};
//! use crudkit_gen::augment::augment;
//! use crudkit_gen::builder::build;
//!
//! let mut schema = Schema::new();
//! schema.insert_type(TypeDef::object(
//!     "Movie",
//!     vec![FieldDef::new("title", TypeRef::named("String").non_null())],
//! ));
//! let schema = augment(schema).unwrap().schema;
//!
//! let op = Operation {
//!     name: "ListMovies".to_string(),
//!     kind: OperationKind::Query,
//!     variables: vec![],
//!     selections: vec![Selection::field_with("movies", vec![Selection::field("title")])],
//! };
//!
//! let model = build(&op, &schema, "crate::sdk").unwrap();
//! assert!(model.variables.is_none());
//! assert_eq!(model.response.unwrap().name, "ListMoviesData");
//! ```

mod convenience;
mod nested;
mod types;

pub use types::{VariableDefinition, render_type};

use crudkit_define::model::mark_last_parameter;
use crudkit_define::{
    GeneratedClass, GeneratedClassModel, Operation, Schema, SecondaryConstructor, Selection,
};

use crate::errors::GeneratorError;
use crate::picker::{pick_projection, selection_projection};
use nested::ListRevisit;
use types::{parameter, resolve};

/// Suffix of the variables class name.
pub const VARIABLES_CLASS_SUFFIX: &str = "Variables";

/// Suffix of the response class name.
pub const RESPONSE_CLASS_SUFFIX: &str = "Data";

/// Builds the class model for one operation.
///
/// `package` is the target-language package the rendered code lives in.
///
/// ## Errors
///
/// - [`GeneratorError::SchemaConsistency`] if a variable, field, or nested
///   field references a type missing from `schema`.
/// - [`GeneratorError::UnknownField`] if a top-level selection is not a
///   field of the root type.
/// - [`GeneratorError::UnsupportedSelection`] for fragments and nested
///   aliases.
/// - [`GeneratorError::UnknownPickedField`], [`GeneratorError::CyclicType`],
///   [`GeneratorError::ConflictingProjection`], and
///   [`GeneratorError::DuplicateParameter`] from flattening.
pub fn build(
    operation: &Operation,
    schema: &Schema,
    package: &str,
) -> Result<GeneratedClassModel, GeneratorError> {
    let variables = variable_definitions(operation, schema)?;
    let fields = response_definitions(operation, schema)?;

    let mut model = GeneratedClassModel {
        package: package.to_string(),
        operation_name: operation.name.clone(),
        operation_kind: operation.kind,
        variables: None,
        response: None,
        convenience_parameters: Vec::new(),
        convenience_arguments: Vec::new(),
    };

    if !variables.is_empty() {
        let class_name = variables_class_name(&operation.name);
        let mut class = build_class(
            schema,
            &operation.name,
            &class_name,
            &variables,
            ListRevisit::Reuse,
        )?;

        let flattened = convenience::flatten(schema, &operation.name, &variables)?;
        if variables.iter().any(VariableDefinition::is_flattened) {
            class.secondary_constructors.push(SecondaryConstructor {
                parameters: flattened.parameters(),
                primary_constructor_arguments: flattened.arguments(""),
            });
        }

        model.convenience_parameters = flattened.parameters();
        model.convenience_arguments =
            flattened.arguments(&format!("{}.{class_name}.", operation.name));
        model.variables = Some(class);
    }

    if !fields.is_empty() {
        let class_name = response_class_name(&operation.name);
        model.response = Some(build_class(
            schema,
            &operation.name,
            &class_name,
            &fields,
            ListRevisit::Match,
        )?);
    }

    Ok(model)
}

/// `<Op>Variables`
pub fn variables_class_name(operation: &str) -> String {
    format!("{operation}{VARIABLES_CLASS_SUFFIX}")
}

/// `<Op>Data`
pub fn response_class_name(operation: &str) -> String {
    format!("{operation}{RESPONSE_CLASS_SUFFIX}")
}

fn build_class(
    schema: &Schema,
    operation: &str,
    name: &str,
    definitions: &[VariableDefinition<'_>],
    list_revisit: ListRevisit,
) -> Result<GeneratedClass, GeneratorError> {
    let mut constructor_parameters: Vec<_> = definitions
        .iter()
        .map(|definition| parameter(&definition.name, &definition.ty))
        .collect();
    mark_last_parameter(&mut constructor_parameters);

    Ok(GeneratedClass {
        name: name.to_string(),
        constructor_parameters,
        nested_classes: nested::nested_classes(schema, operation, definitions, list_revisit)?,
        secondary_constructors: Vec::new(),
    })
}

fn variable_definitions<'s>(
    operation: &Operation,
    schema: &'s Schema,
) -> Result<Vec<VariableDefinition<'s>>, GeneratorError> {
    operation
        .variables
        .iter()
        .map(|variable| {
            let definition = resolve(schema, &variable.ty, || {
                format!("variable \"${}\" of operation \"{}\"", variable.name, operation.name)
            })?;
            Ok(VariableDefinition {
                name: variable.name.clone(),
                ty: variable.ty.clone(),
                definition,
                projection: pick_projection(variable, definition)?,
            })
        })
        .collect()
}

/// One definition per response key, in first-seen order. Repeated keys
/// merge their sub-selections.
fn response_definitions<'s>(
    operation: &Operation,
    schema: &'s Schema,
) -> Result<Vec<VariableDefinition<'s>>, GeneratorError> {
    let root = schema.root(operation.kind);
    let mut definitions: Vec<VariableDefinition<'s>> = Vec::new();

    for selection in &operation.selections {
        let Selection::Field(field) = selection else {
            return Err(GeneratorError::UnsupportedSelection {
                kind: selection.kind_name().to_string(),
                location: operation.name.clone(),
            });
        };

        let field_def = root.field(&field.name).ok_or_else(|| GeneratorError::UnknownField {
            type_name: root.name.clone(),
            field: field.name.clone(),
        })?;
        let key = field.response_key();
        let location = format!("{}.{key}", operation.name);
        let projection = selection_projection(&field.selections, &location)?;

        if let Some(existing) = definitions.iter_mut().find(|d| d.name == key) {
            existing.projection = std::mem::take(&mut existing.projection).merge(projection);
            continue;
        }

        let definition = resolve(schema, &field_def.ty, || {
            format!("field \"{}.{}\"", root.name, field_def.name)
        })?;
        definitions.push(VariableDefinition {
            name: key.to_string(),
            ty: field_def.ty.clone(),
            definition,
            projection,
        });
    }

    Ok(definitions)
}
