//! Convenience constructor synthesis.
//!
//! Flattening replaces every non-scalar value by the depth-first
//! concatenation of its (projected) fields, down to scalar leaves. The
//! resulting leaf list is the parameter list of the convenience
//! constructor. Alongside it a [`Shape`] tree records how the leaves fit
//! back together, from which the forwarding arguments that rebuild the
//! nested objects are produced.
//!
//! List-typed values are never flattened; a list of objects is one leaf.

use std::collections::{HashMap, HashSet};

use crudkit_define::model::{mark_last_argument, mark_last_parameter};
use crudkit_define::{
    ConstructorCall, ForwardedValue, ForwardingArgument, FunctionParameter, Schema, TypeDef,
    TypeRef,
};

use super::types::{VariableDefinition, parameter, resolve};
use crate::errors::GeneratorError;
use crate::picker::{Projection, filter_fields};

/// How flattened leaves reassemble into the original nested value.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Shape {
    /// Index into the leaf list.
    Leaf(usize),
    Nested {
        type_name: String,
        nullable: bool,
        fields: Vec<(String, Shape)>,
    },
}

#[derive(Debug)]
struct Leaf {
    /// Field names from the variable down to the leaf.
    path: Vec<String>,
    ty: TypeRef,
}

/// The flattened leaves of a set of variables plus their reassembly plan.
#[derive(Debug)]
pub(crate) struct Flattened {
    parameters: Vec<FunctionParameter>,
    shapes: Vec<(String, Shape)>,
}

impl Flattened {
    /// Flattened parameters in depth-first order, the last one marked.
    pub(crate) fn parameters(&self) -> Vec<FunctionParameter> {
        self.parameters.clone()
    }

    /// Arguments for the primary constructor of the class owning the
    /// variables, with nested calls named `<prefix><TypeName>`.
    pub(crate) fn arguments(&self, prefix: &str) -> Vec<ForwardingArgument> {
        let mut arguments: Vec<_> = self
            .shapes
            .iter()
            .map(|(name, shape)| self.forward(name, shape, prefix))
            .collect();
        mark_last_argument(&mut arguments);
        arguments
    }

    fn forward(&self, name: &str, shape: &Shape, prefix: &str) -> ForwardingArgument {
        let value = match shape {
            Shape::Leaf(index) => ForwardedValue::Parameter(self.parameters[*index].name.clone()),
            Shape::Nested {
                type_name,
                nullable,
                fields,
            } => {
                let mut arguments: Vec<_> = fields
                    .iter()
                    .map(|(field, shape)| self.forward(field, shape, prefix))
                    .collect();
                mark_last_argument(&mut arguments);
                ForwardedValue::Call(ConstructorCall {
                    function_name: format!("{prefix}{type_name}"),
                    arguments,
                    nullable: *nullable,
                })
            }
        };
        ForwardingArgument {
            name: name.to_string(),
            value,
            is_last: false,
        }
    }
}

/// Flattens `variables` into leaf parameters.
///
/// A leaf is named after its field unless another leaf shares that name;
/// colliding leaves are named by their underscore-joined path instead
/// (`m_studio_id`).
///
/// ## Errors
///
/// - [`GeneratorError::CyclicType`] if a type contains itself.
/// - [`GeneratorError::DuplicateParameter`] if two leaves still share a
///   name after qualification.
/// - [`GeneratorError::SchemaConsistency`] if a field's type is missing.
pub(crate) fn flatten(
    schema: &Schema,
    operation: &str,
    variables: &[VariableDefinition<'_>],
) -> Result<Flattened, GeneratorError> {
    let mut flattener = Flattener {
        schema,
        leaves: Vec::new(),
        expanding: Vec::new(),
    };

    let mut shapes = Vec::with_capacity(variables.len());
    for variable in variables {
        let shape = flattener.flatten_value(
            vec![variable.name.clone()],
            &variable.ty,
            variable.definition,
            &variable.projection,
        )?;
        shapes.push((variable.name.clone(), shape));
    }

    let parameters = name_leaves(operation, &flattener.leaves)?;
    Ok(Flattened { parameters, shapes })
}

struct Flattener<'s> {
    schema: &'s Schema,
    leaves: Vec<Leaf>,
    /// Types currently being expanded, outermost first.
    expanding: Vec<String>,
}

impl Flattener<'_> {
    fn flatten_value(
        &mut self,
        path: Vec<String>,
        ty: &TypeRef,
        definition: &TypeDef,
        projection: &Projection,
    ) -> Result<Shape, GeneratorError> {
        if definition.is_scalar() || ty.is_list() {
            self.leaves.push(Leaf {
                path,
                ty: ty.clone(),
            });
            return Ok(Shape::Leaf(self.leaves.len() - 1));
        }

        if let Some(start) = self.expanding.iter().position(|name| *name == definition.name) {
            let mut cycle = self.expanding[start..].to_vec();
            cycle.push(definition.name.clone());
            return Err(GeneratorError::CyclicType {
                cycle: cycle.join(" -> "),
            });
        }

        self.expanding.push(definition.name.clone());
        let mut fields = Vec::new();
        for field in filter_fields(definition, projection)? {
            let child = resolve(self.schema, &field.ty, || {
                format!("field \"{}.{}\"", definition.name, field.name)
            })?;
            let mut child_path = path.clone();
            child_path.push(field.name.clone());
            let shape = self.flatten_value(
                child_path,
                &field.ty,
                child,
                &projection.child(&field.name),
            )?;
            fields.push((field.name.clone(), shape));
        }
        self.expanding.pop();

        Ok(Shape::Nested {
            type_name: definition.name.clone(),
            nullable: ty.nullable,
            fields,
        })
    }
}

fn name_leaves(operation: &str, leaves: &[Leaf]) -> Result<Vec<FunctionParameter>, GeneratorError> {
    let short_name = |leaf: &Leaf| leaf.path.last().cloned().unwrap_or_default();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for leaf in leaves {
        *counts.entry(short_name(leaf)).or_default() += 1;
    }

    let mut used = HashSet::new();
    let mut parameters = Vec::with_capacity(leaves.len());
    for leaf in leaves {
        let short = short_name(leaf);
        let name = if counts.get(&short).copied().unwrap_or(0) > 1 {
            leaf.path.join("_")
        } else {
            short
        };
        if !used.insert(name.clone()) {
            return Err(GeneratorError::DuplicateParameter {
                operation: operation.to_string(),
                name,
            });
        }
        parameters.push(parameter(&name, &leaf.ty));
    }

    mark_last_parameter(&mut parameters);
    Ok(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::pick_projection;
    use crate::test_utils::augmented_movie_schema;
    use crudkit_define::{FieldDef, VariableDecl};

    fn definition<'s>(schema: &'s Schema, decl: &VariableDecl) -> VariableDefinition<'s> {
        let type_def = schema.get(decl.ty.innermost_name()).unwrap();
        VariableDefinition {
            name: decl.name.clone(),
            ty: decl.ty.clone(),
            definition: type_def,
            projection: pick_projection(decl, type_def).unwrap(),
        }
    }

    fn rendered(params: &[FunctionParameter]) -> Vec<String> {
        params
            .iter()
            .map(|p| format!("{}: {}", p.name, p.ty))
            .collect()
    }

    // === flattening ===

    #[test]
    fn picked_variable_flattens_to_picked_leaves() {
        let schema = augmented_movie_schema();
        let decl = VariableDecl::new("m", TypeRef::named("Movie_Data")).with_pick(["title"]);
        let flattened = flatten(&schema, "InsertMovie", &[definition(&schema, &decl)]).unwrap();

        let params = flattened.parameters();
        assert_eq!(rendered(&params), vec!["title: String"]);
        assert!(params[0].is_last);
    }

    #[test]
    fn nested_objects_flatten_depth_first() {
        let schema = augmented_movie_schema();
        let decl = VariableDecl::new("m", TypeRef::named("Movie_Data"));
        let flattened = flatten(&schema, "InsertMovie", &[definition(&schema, &decl)]).unwrap();

        assert_eq!(
            rendered(&flattened.parameters()),
            vec![
                "m_id: String",
                "title: String",
                "m_studio_id: String",
                "name: String",
                "movies_as_studio: List<Movie_Data>",
            ]
        );
    }

    #[test]
    fn scalar_variables_are_their_own_leaves() {
        let schema = augmented_movie_schema();
        let id = VariableDecl::new("id", TypeRef::named("String"));
        let data = VariableDecl::new("data", TypeRef::named("Movie_Data")).with_pick(["title"]);
        let flattened = flatten(
            &schema,
            "UpdateMovie",
            &[definition(&schema, &id), definition(&schema, &data)],
        )
        .unwrap();

        assert_eq!(
            rendered(&flattened.parameters()),
            vec!["id: String?", "title: String"]
        );
    }

    #[test]
    fn list_of_objects_is_one_leaf() {
        let schema = augmented_movie_schema();
        let decl = VariableDecl::new(
            "movies",
            TypeRef::list(TypeRef::named("Movie_Data").non_null()).non_null(),
        );
        let flattened = flatten(&schema, "InsertMany", &[definition(&schema, &decl)]).unwrap();

        assert_eq!(
            rendered(&flattened.parameters()),
            vec!["movies: List<Movie_Data>"]
        );
        let args = flattened.arguments("");
        assert_eq!(
            args[0].value,
            ForwardedValue::Parameter("movies".to_string())
        );
    }

    #[test]
    fn unresolvable_duplicate_fails() {
        let schema = augmented_movie_schema();
        let a = VariableDecl::new("m_title", TypeRef::named("String"));
        let b = VariableDecl::new("m", TypeRef::named("Movie_Data")).with_pick(["title"]);
        let c = VariableDecl::new("title", TypeRef::named("String"));
        let err = flatten(
            &schema,
            "Clash",
            &[
                definition(&schema, &a),
                definition(&schema, &b),
                definition(&schema, &c),
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::DuplicateParameter { ref name, .. } if name == "m_title"
        ));
    }

    #[test]
    fn self_containing_input_is_a_cycle() {
        let mut schema = Schema::new();
        schema.insert_type(TypeDef {
            name: "Node_Data".to_string(),
            kind: crudkit_define::TypeKind::Input,
            fields: vec![FieldDef::new("next", TypeRef::named("Node_Data"))],
            builtin: false,
            description: None,
        });
        let decl = VariableDecl::new("n", TypeRef::named("Node_Data"));
        let err = flatten(&schema, "Op", &[definition(&schema, &decl)]).unwrap_err();
        assert!(matches!(err, GeneratorError::CyclicType { .. }));
    }

    // === forwarding ===

    #[test]
    fn forwarding_rebuilds_nested_shape() {
        let schema = augmented_movie_schema();
        let decl = VariableDecl::new("m", TypeRef::named("Movie_Data"));
        let flattened = flatten(&schema, "InsertMovie", &[definition(&schema, &decl)]).unwrap();

        let args = flattened.arguments("InsertMovie.InsertMovieVariables.");
        assert_eq!(args.len(), 1);
        assert!(args[0].is_last);

        let movie = args[0].call().unwrap();
        assert_eq!(
            movie.function_name,
            "InsertMovie.InsertMovieVariables.Movie_Data"
        );
        assert!(movie.nullable);
        let fields: Vec<_> = movie.arguments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(fields, vec!["id", "title", "studio"]);
        assert_eq!(
            movie.arguments[0].value,
            ForwardedValue::Parameter("m_id".to_string())
        );

        let studio = movie.arguments[2].call().unwrap();
        assert_eq!(
            studio.function_name,
            "InsertMovie.InsertMovieVariables.Studio_Data"
        );
        assert_eq!(
            studio.arguments[1].value,
            ForwardedValue::Parameter("name".to_string())
        );
        assert_eq!(
            studio.arguments[2].value,
            ForwardedValue::Parameter("movies_as_studio".to_string())
        );
        assert!(studio.arguments[2].is_last);
    }

    #[test]
    fn empty_prefix_names_bare_type() {
        let schema = augmented_movie_schema();
        let decl =
            VariableDecl::new("m", TypeRef::named("Movie_Data").non_null()).with_pick(["title"]);
        let flattened = flatten(&schema, "InsertMovie", &[definition(&schema, &decl)]).unwrap();

        let call = flattened.arguments("")[0].call().cloned().unwrap();
        assert_eq!(call.function_name, "Movie_Data");
        assert!(!call.nullable);
    }
}
