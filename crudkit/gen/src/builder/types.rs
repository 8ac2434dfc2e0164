//! Type rendering and the synthetic variable definitions fed to flattening.

use crudkit_define::scalar::rendered_type_name;
use crudkit_define::{
    FunctionParameter, RenderedType, Schema, TypeDef, TypeRef, TypeRefKind,
};

use crate::errors::GeneratorError;
use crate::picker::Projection;

/// One entry of the starting list for class flattening.
///
/// For the variables class this is a declared operation variable; for the
/// response class it is a top-level selected field.
#[derive(Debug, Clone)]
pub struct VariableDefinition<'s> {
    /// Parameter name: the variable name or the field's response key.
    pub name: String,
    pub ty: TypeRef,
    /// Resolved definition of the innermost named type of `ty`.
    pub definition: &'s TypeDef,
    pub projection: Projection,
}

impl VariableDefinition<'_> {
    pub fn is_scalar(&self) -> bool {
        self.definition.is_scalar()
    }

    /// Non-scalar, non-list values are replaced by their fields when
    /// flattening.
    pub fn is_flattened(&self) -> bool {
        !self.is_scalar() && !self.ty.is_list()
    }
}

/// Renders a type reference with the fixed scalar mapping, keeping list
/// wrapping and nullability at every level.
///
/// ```
/// use crudkit_define::TypeRef;
/// use crudkit_gen::builder::render_type;
///
/// let ty = TypeRef::list(TypeRef::named("ID").non_null());
/// assert_eq!(render_type(&ty).to_string(), "List<String>?");
/// ```
pub fn render_type(ty: &TypeRef) -> RenderedType {
    match &ty.kind {
        TypeRefKind::Named(name) => RenderedType::Named {
            name: rendered_type_name(name).to_string(),
            nullable: ty.nullable,
        },
        TypeRefKind::List(element) => RenderedType::List {
            element: Box::new(render_type(element)),
            nullable: ty.nullable,
        },
    }
}

pub(crate) fn parameter(name: &str, ty: &TypeRef) -> FunctionParameter {
    FunctionParameter {
        name: name.to_string(),
        ty: render_type(ty),
        is_last: false,
    }
}

/// Resolves the innermost named type of `ty`.
pub(crate) fn resolve<'s>(
    schema: &'s Schema,
    ty: &TypeRef,
    owner: impl FnOnce() -> String,
) -> Result<&'s TypeDef, GeneratorError> {
    let name = ty.innermost_name();
    schema
        .get(name)
        .ok_or_else(|| GeneratorError::missing_type(name, owner()))
}
