//! Generated-class model handed to the renderer.
//!
//! The Operation Model Builder produces one [`GeneratedClassModel`] per
//! operation. It is language-neutral: types are [`RenderedType`]s, classes
//! are named constructors with ordered parameters, and convenience
//! constructors are described by [`ForwardingArgument`] trees that rebuild
//! nested objects from flattened scalar parameters.
//!
//! ## Shape
//!
//! ```text
//! GeneratedClassModel
//! ├── variables: GeneratedClass          (GetMovieVariables)
//! │   ├── constructor_parameters         (id: String, m: Movie_Data?)
//! │   ├── nested_classes                 (Movie_Data, Studio, ...)
//! │   └── secondary_constructors         (flattened leaves -> primary)
//! ├── response: GeneratedClass           (GetMovieData)
//! └── convenience_parameters/arguments   (operation-level helper)
//! ```

use std::fmt;

use serde::Serialize;

use crate::operation::OperationKind;

/// A type as it appears in generated code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum RenderedType {
    Named { name: String, nullable: bool },
    List { element: Box<RenderedType>, nullable: bool },
}

impl RenderedType {
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Named { nullable, .. } | Self::List { nullable, .. } => *nullable,
        }
    }
}

impl fmt::Display for RenderedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { name, .. } => write!(f, "{name}")?,
            Self::List { element, .. } => write!(f, "List<{element}>")?,
        }
        if self.is_nullable() {
            write!(f, "?")?;
        }
        Ok(())
    }
}

/// One parameter of a constructor or function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionParameter {
    pub name: String,
    pub ty: RenderedType,
    /// Set on the final parameter only, for separator formatting.
    pub is_last: bool,
}

/// A call to a nested class's constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstructorCall {
    /// `<prefix><TypeName>`, e.g. `GetMovie.GetMovieVariables.Movie_Data`.
    pub function_name: String,
    pub arguments: Vec<ForwardingArgument>,
    /// The receiving parameter accepts null.
    pub nullable: bool,
}

/// What a forwarding argument passes along.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ForwardedValue {
    /// A flattened parameter of the enclosing function, by name.
    Parameter(String),
    /// A nested constructor call rebuilding a non-scalar value.
    Call(ConstructorCall),
}

/// A named argument passed to a primary constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForwardingArgument {
    /// Name of the receiving parameter.
    pub name: String,
    pub value: ForwardedValue,
    pub is_last: bool,
}

impl ForwardingArgument {
    pub fn call(&self) -> Option<&ConstructorCall> {
        match &self.value {
            ForwardedValue::Call(call) => Some(call),
            ForwardedValue::Parameter(_) => None,
        }
    }
}

/// A constructor taking flattened leaves and delegating to the primary one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecondaryConstructor {
    pub parameters: Vec<FunctionParameter>,
    pub primary_constructor_arguments: Vec<ForwardingArgument>,
}

/// A generated data class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedClass {
    pub name: String,
    pub constructor_parameters: Vec<FunctionParameter>,
    pub nested_classes: Vec<GeneratedClass>,
    pub secondary_constructors: Vec<SecondaryConstructor>,
}

impl GeneratedClass {
    /// Returns `true` if the class needs a body beyond its primary constructor.
    pub fn has_body(&self) -> bool {
        !self.nested_classes.is_empty() || !self.secondary_constructors.is_empty()
    }

    /// Looks up a nested class by name.
    pub fn nested_class(&self, name: &str) -> Option<&GeneratedClass> {
        self.nested_classes.iter().find(|class| class.name == name)
    }

    /// Looks up a primary constructor parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&FunctionParameter> {
        self.constructor_parameters
            .iter()
            .find(|param| param.name == name)
    }
}

/// Everything the renderer needs for one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedClassModel {
    pub package: String,
    pub operation_name: String,
    pub operation_kind: OperationKind,
    /// `None` when the operation declares no variables.
    pub variables: Option<GeneratedClass>,
    /// `None` when the operation selects nothing.
    pub response: Option<GeneratedClass>,
    /// Flattened parameters of the operation-level convenience function.
    pub convenience_parameters: Vec<FunctionParameter>,
    /// Arguments that rebuild the variables class from those parameters.
    pub convenience_arguments: Vec<ForwardingArgument>,
}

/// Marks the last element of a parameter list.
pub fn mark_last_parameter(parameters: &mut [FunctionParameter]) {
    let count = parameters.len();
    for (index, param) in parameters.iter_mut().enumerate() {
        param.is_last = index + 1 == count;
    }
}

/// Marks the last element of an argument list.
pub fn mark_last_argument(arguments: &mut [ForwardingArgument]) {
    let count = arguments.len();
    for (index, arg) in arguments.iter_mut().enumerate() {
        arg.is_last = index + 1 == count;
    }
}
