//! Output assembly and file writing for generated code.
//!
//! This module handles the final phase of code generation: assembling the
//! per-operation modules and their `mod.rs`, validating the output,
//! formatting it, and writing it to disk atomically.
//!
//! ## Output Structure
//!
//! ```text
//! <output_dir>/
//! ├── mod.rs           # `pub mod` declaration per operation
//! ├── get_movie.rs     # GetMovie query
//! └── insert_movie.rs  # InsertMovie mutation
//! ```
//!
//! ## Safety Guarantees
//!
//! - **Validation**: All generated code is validated with `syn` before writing
//! - **Formatting**: Output is formatted with `prettyplease` for consistent style
//! - **Atomic writes**: Uses temp file + rename pattern to prevent partial writes

use std::fs;
use std::path::Path;

use crudkit_define::GeneratedClassModel;
use proc_macro2::TokenStream;
use quote::quote;

use crate::codegen::naming::value_ident;
use crate::codegen::{generate_operation, operation_module_name};
use crate::errors::GeneratorError;

/// Name of the file declaring every operation module.
pub const MOD_FILE: &str = "mod.rs";

/// One formatted file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub file_name: String,
    pub content: String,
}

/// Assembles `mod.rs` declaring one module per operation, in order.
///
/// Operation names are converted the same way as module file stems, so
/// keywords become raw identifiers.
pub fn assemble_mod_rs(operations: &[String]) -> TokenStream {
    let modules = operations.iter().map(|name| value_ident(name));

    quote! {
        //! Generated GraphQL operations.
        //!
        //! Each module holds the variables and response types of one
        //! operation.

        #(pub mod #modules;)*
    }
}

/// Validates generated code by parsing it with syn.
///
/// ## Returns
///
/// The parsed `syn::File` on success, or an error if the code is invalid.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the code fails to parse.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {e}")))
}

/// Formats generated code using prettyplease.
///
/// Converts a parsed syn::File back to a nicely formatted string,
/// prepending an auto-generated notice as a regular comment.
pub fn format_code(file: &syn::File) -> String {
    let formatted = prettyplease::unparse(file);
    format!(
        "// This code was automatically generated by crudkit-gen. Do not edit manually.\n\n{formatted}"
    )
}

/// Writes content to a file atomically using temp file + rename.
///
/// Readers see either the old or the new content, never a partial write.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if:
/// - Parent directories cannot be created
/// - The temp file cannot be written
/// - The rename operation fails
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Generates, validates, and formats one file per model plus `mod.rs`.
///
/// `mod.rs` comes last.
///
/// ## Errors
///
/// Returns an error if code generation fails, produces invalid Rust, or two
/// operations map to the same module name.
pub fn render_files(models: &[GeneratedClassModel]) -> Result<Vec<GeneratedFile>, GeneratorError> {
    let mut files = Vec::with_capacity(models.len() + 1);
    let mut module_names: Vec<String> = Vec::with_capacity(models.len());
    let mut operations: Vec<String> = Vec::with_capacity(models.len());

    for model in models {
        let module_name = operation_module_name(&model.operation_name);
        if module_names.contains(&module_name) {
            return Err(GeneratorError::NamingCollision {
                kind: "operation module".to_string(),
                name: module_name,
                owner: "the output directory".to_string(),
            });
        }

        let file = validate_code(&generate_operation(model)?)?;
        files.push(GeneratedFile {
            file_name: format!("{module_name}.rs"),
            content: format_code(&file),
        });
        module_names.push(module_name);
        operations.push(model.operation_name.clone());
    }

    let mod_file = validate_code(&assemble_mod_rs(&operations))?;
    files.push(GeneratedFile {
        file_name: MOD_FILE.to_string(),
        content: format_code(&mod_file),
    });

    Ok(files)
}

/// Writes `files` into `output_dir`, or prints them when `dry_run` is set.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if any file cannot be written.
pub fn write_all(
    files: &[GeneratedFile],
    output_dir: &Path,
    dry_run: bool,
) -> Result<(), GeneratorError> {
    for file in files {
        if dry_run {
            println!("=== {} ===\n{}\n", file.file_name, file.content);
        } else {
            write_atomic(&output_dir.join(&file.file_name), &file.content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::test_utils::{
        augmented_movie_schema, get_movie_operation, insert_movie_operation, make_operation,
    };
    use crudkit_define::{OperationKind, Selection};
    use tempfile::TempDir;

    fn movie_models() -> Vec<GeneratedClassModel> {
        let schema = augmented_movie_schema();
        vec![
            build(&get_movie_operation(), &schema, "crate").unwrap(),
            build(&insert_movie_operation(None), &schema, "crate").unwrap(),
        ]
    }

    // === validate_code / format_code ===

    #[test]
    fn validate_code_accepts_valid_code() {
        let tokens = quote! {
            pub struct Foo;
        };
        assert!(validate_code(&tokens).is_ok());
    }

    #[test]
    fn validate_code_rejects_invalid_code() {
        // valid tokens, but not a valid Rust file
        let invalid_tokens = quote! {
            let x =
        };

        match validate_code(&invalid_tokens) {
            Err(GeneratorError::CodeGenError(message)) => {
                assert!(message.contains("Generated code is invalid"));
            }
            Err(other) => panic!("Unexpected error type: {:?}", other),
            Ok(_) => panic!("Expected error but got success"),
        }
    }

    #[test]
    fn format_code_prepends_notice() {
        let file = validate_code(&quote! { pub struct Foo; }).unwrap();
        let formatted = format_code(&file);
        assert!(formatted.starts_with("// This code was automatically generated by crudkit-gen."));
        assert!(formatted.contains("pub struct Foo;"));
    }

    // === mod.rs ===

    #[test]
    fn mod_rs_declares_each_operation() {
        let file = validate_code(&assemble_mod_rs(&[
            "GetMovie".to_string(),
            "InsertMovie".to_string(),
        ]))
        .unwrap();
        let code = format_code(&file);
        let get = code.find("pub mod get_movie;").unwrap();
        let insert = code.find("pub mod insert_movie;").unwrap();
        assert!(get < insert);
    }

    #[test]
    fn keyword_operation_names_match_their_files() {
        let schema = augmented_movie_schema();
        let models: Vec<_> = ["Type", "Match", "Self"]
            .into_iter()
            .map(|name| {
                let op = make_operation(
                    name,
                    OperationKind::Query,
                    vec![],
                    vec![Selection::field_with("movies", vec![Selection::field("id")])],
                );
                build(&op, &schema, "crate").unwrap()
            })
            .collect();

        let files = render_files(&models).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["type.rs", "match.rs", "self_.rs", "mod.rs"]);

        let mod_rs = &files[3].content;
        assert!(mod_rs.contains("pub mod r#type;"));
        assert!(mod_rs.contains("pub mod r#match;"));
        assert!(mod_rs.contains("pub mod self_;"));
    }

    // === render_files ===

    #[test]
    fn render_files_emits_module_per_operation_then_mod_rs() {
        let files = render_files(&movie_models()).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["get_movie.rs", "insert_movie.rs", "mod.rs"]);
        assert!(files[1].content.contains("pub struct InsertMovieVariables"));
    }

    #[test]
    fn duplicate_module_names_are_rejected() {
        let mut models = movie_models();
        models.push(models[0].clone());
        let err = render_files(&models).unwrap_err();
        assert!(matches!(err, GeneratorError::NamingCollision { .. }));
    }

    // === write_atomic / write_all ===

    #[test]
    fn write_atomic_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("deep").join("file.rs");

        write_atomic(&path, "// content").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "// content");
    }

    #[test]
    fn write_atomic_overwrites_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.rs");

        write_atomic(&path, "// old").unwrap();
        write_atomic(&path, "// new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "// new");
        assert!(!temp.path().join("test.tmp").exists());
    }

    #[test]
    fn write_all_writes_every_file() {
        let temp = TempDir::new().unwrap();
        let files = render_files(&movie_models()).unwrap();

        write_all(&files, temp.path(), false).unwrap();

        for file in &files {
            let written = fs::read_to_string(temp.path().join(&file.file_name)).unwrap();
            assert_eq!(written, file.content);
        }
    }

    #[test]
    fn write_all_dry_run_creates_nothing() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out");
        let files = render_files(&movie_models()).unwrap();

        write_all(&files, &output, true).unwrap();

        assert!(!output.exists());
    }
}
