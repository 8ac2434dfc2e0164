//! Struct generation for generated classes.
//!
//! A top-level class (the variables or response class) becomes a struct at
//! the root of the operation module. Its nested classes go in a submodule
//! named after it, so two operations can both declare a `Movie` without
//! clashing:
//!
//! ```ignore
//! pub struct GetMovieData {
//!     pub movie: get_movie_data::Movie,
//! }
//!
//! pub mod get_movie_data {
//!     pub struct Movie { pub id: String, pub title: String }
//! }
//! ```

use std::collections::HashSet;

use crudkit_define::scalar::is_rendered_result_marker;
use crudkit_define::{
    ForwardedValue, ForwardingArgument, FunctionParameter, GeneratedClass, RenderedType,
};
use proc_macro2::{Ident, TokenStream};
use quote::quote;

use super::naming::{type_ident, value_ident};
use crate::errors::GeneratorError;

/// Where generated type references and constructor calls resolve from.
pub(crate) struct Scope<'a> {
    /// Root module path of the generated code, e.g. `crate::sdk`.
    pub package: &'a syn::Path,
    /// Submodule holding the nested classes of the current top-level
    /// class. `None` when generating inside that submodule.
    pub nested_module: Option<&'a Ident>,
}

/// Maps a rendered type to a Rust type.
///
/// Scalars map to `i32`, `f64`, `String` and `bool`; result markers to
/// `serde_json::Value`; lists to `Vec`; nullable types to `Option`. Any
/// other name is a generated class.
pub(crate) fn rust_type(ty: &RenderedType, scope: &Scope<'_>) -> TokenStream {
    let (inner, nullable) = match ty {
        RenderedType::Named { name, nullable } => (named_type(name, scope), *nullable),
        RenderedType::List { element, nullable } => {
            let element = rust_type(element, scope);
            (quote!(Vec<#element>), *nullable)
        }
    };
    if nullable {
        quote!(Option<#inner>)
    } else {
        inner
    }
}

fn named_type(name: &str, scope: &Scope<'_>) -> TokenStream {
    match name {
        "Int" => quote!(i32),
        "Float" => quote!(f64),
        "String" => quote!(String),
        "Boolean" => quote!(bool),
        marker if is_rendered_result_marker(marker) => quote!(serde_json::Value),
        class => {
            let ident = type_ident(class);
            match scope.nested_module {
                Some(module) => quote!(#module::#ident),
                None => quote!(#ident),
            }
        }
    }
}

/// Generates a top-level class, its `impl` block, and its nested classes.
///
/// `doc` becomes the struct's doc comment.
///
/// ## Errors
///
/// - [`GeneratorError::NamingCollision`] if two fields or two nested
///   classes map to the same Rust identifier.
/// - [`GeneratorError::CodeGenError`] if a forwarded constructor name
///   cannot be resolved.
pub(crate) fn generate_class(
    class: &GeneratedClass,
    doc: &str,
    package: &syn::Path,
) -> Result<TokenStream, GeneratorError> {
    let module = value_ident(&class.name);
    let outer = Scope {
        package,
        nested_module: Some(&module),
    };
    let inner = Scope {
        package,
        nested_module: None,
    };

    let mut secondary = Vec::with_capacity(class.secondary_constructors.len());
    for constructor in &class.secondary_constructors {
        secondary.push(generate_from_flattened(
            &constructor.parameters,
            &constructor.primary_constructor_arguments,
            &outer,
        )?);
    }
    let definition = generate_struct(
        &class.name,
        &class.constructor_parameters,
        doc,
        &outer,
        &secondary,
    )?;

    if class.nested_classes.is_empty() {
        return Ok(definition);
    }

    let mut nested_idents = HashSet::new();
    let mut nested = Vec::with_capacity(class.nested_classes.len());
    for nested_class in &class.nested_classes {
        if !nested_idents.insert(type_ident(&nested_class.name).to_string()) {
            return Err(GeneratorError::NamingCollision {
                kind: "nested class".to_string(),
                name: nested_class.name.clone(),
                owner: format!("class \"{}\"", class.name),
            });
        }
        let doc = format!(" GraphQL type `{}`.", nested_class.name);
        nested.push(generate_struct(
            &nested_class.name,
            &nested_class.constructor_parameters,
            &doc,
            &inner,
            &[],
        )?);
    }

    let module_doc = format!(" Nested types of [`{}`].", type_ident(&class.name));
    Ok(quote! {
        #definition

        #[doc = #module_doc]
        pub mod #module {
            use serde::{Deserialize, Serialize};

            #(#nested)*
        }
    })
}

fn generate_struct(
    name: &str,
    parameters: &[FunctionParameter],
    doc: &str,
    scope: &Scope<'_>,
    extra_methods: &[TokenStream],
) -> Result<TokenStream, GeneratorError> {
    let ident = type_ident(name);

    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(parameters.len());
    let mut field_idents = Vec::with_capacity(parameters.len());
    let mut field_types = Vec::with_capacity(parameters.len());
    for param in parameters {
        let field_ident = value_ident(&param.name);
        let rust_name = field_ident.to_string();
        if !seen.insert(rust_name.clone()) {
            return Err(GeneratorError::NamingCollision {
                kind: "field".to_string(),
                name: rust_name,
                owner: format!("class \"{name}\""),
            });
        }

        let ty = rust_type(&param.ty, scope);
        // serde strips the `r#` prefix of raw identifiers itself
        let rename = if rust_name.trim_start_matches("r#") == param.name {
            quote!()
        } else {
            let graphql_name = &param.name;
            quote!(#[serde(rename = #graphql_name)])
        };
        fields.push(quote! {
            #rename
            pub #field_ident: #ty
        });
        field_idents.push(field_ident);
        field_types.push(ty);
    }

    Ok(quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct #ident {
            #(#fields,)*
        }

        impl #ident {
            /// Creates a value from every field.
            #[allow(clippy::too_many_arguments)]
            pub fn new(#(#field_idents: #field_types),*) -> Self {
                Self { #(#field_idents),* }
            }

            #(#extra_methods)*
        }
    })
}

fn generate_from_flattened(
    parameters: &[FunctionParameter],
    arguments: &[ForwardingArgument],
    scope: &Scope<'_>,
) -> Result<TokenStream, GeneratorError> {
    let (idents, types) = parameter_list(parameters, scope);
    let arguments = forward_arguments(arguments, scope)?;

    Ok(quote! {
        /// Creates a value from flattened scalar parameters, rebuilding
        /// every nested object.
        #[allow(clippy::too_many_arguments)]
        pub fn from_flattened(#(#idents: #types),*) -> Self {
            Self::new(#(#arguments),*)
        }
    })
}

/// Parameter identifiers and types of a flattened parameter list.
pub(crate) fn parameter_list(
    parameters: &[FunctionParameter],
    scope: &Scope<'_>,
) -> (Vec<Ident>, Vec<TokenStream>) {
    parameters
        .iter()
        .map(|param| (value_ident(&param.name), rust_type(&param.ty, scope)))
        .unzip()
}

/// Expressions passing `arguments` to a primary constructor, in order.
pub(crate) fn forward_arguments(
    arguments: &[ForwardingArgument],
    scope: &Scope<'_>,
) -> Result<Vec<TokenStream>, GeneratorError> {
    arguments
        .iter()
        .map(|argument| forward_value(&argument.value, scope))
        .collect()
}

fn forward_value(value: &ForwardedValue, scope: &Scope<'_>) -> Result<TokenStream, GeneratorError> {
    match value {
        ForwardedValue::Parameter(name) => {
            let ident = value_ident(name);
            Ok(quote!(#ident))
        }
        ForwardedValue::Call(call) => {
            let constructor = constructor_path(&call.function_name, scope)?;
            let arguments = forward_arguments(&call.arguments, scope)?;
            let expr = quote!(#constructor(#(#arguments),*));
            Ok(if call.nullable {
                quote!(Some(#expr))
            } else {
                expr
            })
        }
    }
}

/// Resolves `Type` against the current nested module and
/// `Operation.Class.Type` against the package root.
fn constructor_path(function_name: &str, scope: &Scope<'_>) -> Result<TokenStream, GeneratorError> {
    let segments: Vec<&str> = function_name.split('.').collect();
    match segments.as_slice() {
        [ty] => {
            let ty = type_ident(ty);
            Ok(match scope.nested_module {
                Some(module) => quote!(#module::#ty::new),
                None => quote!(#ty::new),
            })
        }
        [operation, class, ty] => {
            let package = scope.package;
            let operation = value_ident(operation);
            let class = value_ident(class);
            let ty = type_ident(ty);
            Ok(quote!(#package::#operation::#class::#ty::new))
        }
        _ => Err(GeneratorError::CodeGenError(format!(
            "Cannot resolve constructor '{function_name}'"
        ))),
    }
}
