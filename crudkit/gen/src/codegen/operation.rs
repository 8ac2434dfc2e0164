//! Per-operation module generation.
//!
//! Each operation becomes one module file containing:
//!
//! - `OPERATION_NAME` and `OPERATION_KIND` constants
//! - `Variables` and `Data` aliases for the variables and response structs
//!   (`()` when the operation has no variables or selects nothing)
//! - the variables and response structs with their nested types
//! - a `variables(...)` function taking flattened parameters

use crudkit_define::GeneratedClassModel;
use proc_macro2::TokenStream;
use quote::quote;

use super::class::{Scope, forward_arguments, generate_class, parameter_list};
use super::naming::{type_ident, value_ident};
use crate::errors::GeneratorError;

/// File stem of the module generated for `operation`.
///
/// Matches the identifier declared in `mod.rs`, minus any `r#` prefix.
///
/// ```
/// use crudkit_gen::codegen::operation_module_name;
///
/// assert_eq!(operation_module_name("GetMovie"), "get_movie");
/// assert_eq!(operation_module_name("Type"), "type");
/// assert_eq!(operation_module_name("Self"), "self_");
/// ```
pub fn operation_module_name(operation: &str) -> String {
    let ident = value_ident(operation).to_string();
    match ident.strip_prefix("r#") {
        Some(raw) => raw.to_string(),
        None => ident,
    }
}

/// Parses the package a model's code is generated into.
///
/// ## Errors
///
/// Returns [`GeneratorError::CodeGenError`] if `package` is not a Rust path.
pub fn parse_package(package: &str) -> Result<syn::Path, GeneratorError> {
    syn::parse_str(package).map_err(|e| {
        GeneratorError::CodeGenError(format!("Invalid package path '{package}': {e}"))
    })
}

/// Generates the module for one operation.
///
/// ## Errors
///
/// Returns an error if the package path is invalid, if names collide once
/// converted to Rust identifiers, or if a forwarded constructor cannot be
/// resolved.
pub fn generate_operation(model: &GeneratedClassModel) -> Result<TokenStream, GeneratorError> {
    let package = parse_package(&model.package)?;
    let name = &model.operation_name;
    let kind = model.operation_kind.to_string();
    let module_doc = format!(" `{name}` {kind}.");

    let (variables_alias, variables_class, convenience) = match &model.variables {
        Some(class) => {
            let ident = type_ident(&class.name);
            let doc = format!(" Variables of the `{name}` {kind}.");
            let definition = generate_class(class, &doc, &package)?;

            let nested_module = value_ident(&class.name);
            let scope = Scope {
                package: &package,
                nested_module: Some(&nested_module),
            };
            let (idents, types) = parameter_list(&model.convenience_parameters, &scope);
            let arguments = forward_arguments(&model.convenience_arguments, &scope)?;
            let convenience = quote! {
                /// Builds [`Variables`] from flattened scalar parameters.
                #[allow(clippy::too_many_arguments)]
                pub fn variables(#(#idents: #types),*) -> Variables {
                    #ident::new(#(#arguments),*)
                }
            };

            (quote!(#ident), definition, convenience)
        }
        None => (quote!(()), quote!(), quote!()),
    };

    let (data_alias, data_class) = match &model.response {
        Some(class) => {
            let ident = type_ident(&class.name);
            let doc = format!(" Response data of the `{name}` {kind}.");
            (quote!(#ident), generate_class(class, &doc, &package)?)
        }
        None => (quote!(()), quote!()),
    };

    Ok(quote! {
        #![doc = #module_doc]

        use serde::{Deserialize, Serialize};

        /// Operation name as written in the document.
        pub const OPERATION_NAME: &str = #name;

        /// `query` or `mutation`.
        pub const OPERATION_KIND: &str = #kind;

        pub type Variables = #variables_alias;

        pub type Data = #data_alias;

        #variables_class

        #data_class

        #convenience
    })
}
