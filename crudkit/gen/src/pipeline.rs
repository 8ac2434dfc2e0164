//! End-to-end generation: load, augment, seal, build, render, write.
//!
//! [`generate_models`] works on in-memory sources; [`run`] reads the files
//! named by a [`GeneratorConfig`] and writes the rendered modules.
//!
//! ## Examples
//!
//! ```
//! use crudkit_gen::pipeline::{Source, generate_models};
//!
//! let schema = Source::new("schema.graphql", "type Movie { id: ID! title: String! }");
//! let ops = Source::new(
//!     "ops.graphql",
//!     "query ListMovies { movies { title } }",
//! );
//!
//! let mut events = Vec::new();
//! let models = generate_models(&schema, &[ops], "crate", &mut events).unwrap();
//! assert_eq!(models[0].operation_name, "ListMovies");
//! assert!(!events.is_empty());
//! ```

use std::fs;
use std::path::Path;

use crudkit_define::GeneratedClassModel;

use crate::augment::augment;
use crate::builder::build;
use crate::config::GeneratorConfig;
use crate::errors::GeneratorError;
use crate::frontend::{load_operations, load_schema, seal};
use crate::output::{GeneratedFile, render_files, write_all};
use crate::sink::{EventSink, GenerationEvent};

/// A named GraphQL document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub path: String,
    pub text: String,
}

impl Source {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Reads a document from disk.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ReadError`] if the file cannot be read.
    pub fn read(path: &Path) -> Result<Self, GeneratorError> {
        let text = fs::read_to_string(path).map_err(|e| GeneratorError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(Self::new(path.display().to_string(), text))
    }
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub models: Vec<GeneratedClassModel>,
    pub files: Vec<GeneratedFile>,
}

/// Builds one model per operation across all operation documents.
///
/// ## Errors
///
/// Returns the first error from any stage; nothing is produced for a run
/// that fails part-way.
pub fn generate_models(
    schema: &Source,
    operations: &[Source],
    package: &str,
    sink: &mut dyn EventSink,
) -> Result<Vec<GeneratedClassModel>, GeneratorError> {
    let loaded = load_schema(&schema.text, &schema.path)?;
    sink.record(GenerationEvent::SchemaLoaded {
        path: schema.path.clone(),
        types: loaded.user_type_names().len(),
    });

    let augmented = augment(loaded)?;
    for change in &augmented.changes {
        sink.record(GenerationEvent::SchemaChanged(change.clone()));
    }

    let sealed = seal(&augmented.schema)?;
    sink.record(GenerationEvent::SchemaSealed);

    let mut models = Vec::new();
    for document in operations {
        let parsed = load_operations(&sealed, &document.text, &document.path)?;
        sink.record(GenerationEvent::OperationsLoaded {
            path: document.path.clone(),
            count: parsed.len(),
        });

        for operation in &parsed {
            let model = build(operation, &augmented.schema, package)?;
            sink.record(GenerationEvent::ModelBuilt {
                operation: operation.name.clone(),
                kind: operation.kind,
            });
            models.push(model);
        }
    }

    Ok(models)
}

/// Runs the generator as configured.
///
/// ## Errors
///
/// Returns [`GeneratorError::ConfigError`] for an invalid configuration,
/// [`GeneratorError::ReadError`] / [`GeneratorError::WriteError`] for I/O
/// failures, and any error from the generation stages.
pub fn run(
    config: &GeneratorConfig,
    sink: &mut dyn EventSink,
) -> Result<GenerationOutput, GeneratorError> {
    config.validate()?;

    let schema = Source::read(&config.schema)?;
    let operations = config
        .operations
        .iter()
        .map(|path| Source::read(path))
        .collect::<Result<Vec<_>, _>>()?;

    let models = generate_models(&schema, &operations, &config.package, sink)?;
    let files = render_files(&models)?;
    write_all(&files, &config.output_dir, config.dry_run)?;

    for file in &files {
        let event = if config.dry_run {
            GenerationEvent::FilePrinted {
                file_name: file.file_name.clone(),
            }
        } else {
            GenerationEvent::FileWritten {
                path: config.output_dir.join(&file.file_name).display().to_string(),
            }
        };
        sink.record(event);
    }

    Ok(GenerationOutput { models, files })
}
