//! Error types for the crudkit generator.

use thiserror::Error;

/// Errors that can occur while loading, augmenting, modelling, or rendering.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A referenced type is missing from the schema's type map.
    #[error("Schema is missing type '{type_name}' referenced by {owner}")]
    SchemaConsistency {
        /// The type name that could not be resolved.
        type_name: String,
        /// Where the reference came from, e.g. `field "Movie.studio"`.
        owner: String,
    },

    /// A selection-set entry is something other than a plain field.
    #[error("Unsupported selection: {kind} in {location}")]
    UnsupportedSelection {
        /// Kind of the offending selection (e.g. "fragment spread").
        kind: String,
        /// Operation and field path containing it.
        location: String,
    },

    /// A chain of non-scalar fields leads back to a type being expanded.
    #[error("Cyclic type reference: {cycle}")]
    CyclicType {
        /// The cycle, rendered as `A -> B -> A`.
        cycle: String,
    },

    /// The same type is reached twice with different field projections, so
    /// one generated class cannot represent both.
    #[error("Type '{type_name}' is used with different field selections in operation '{operation}'")]
    ConflictingProjection {
        operation: String,
        type_name: String,
    },

    /// A `@pick` directive names a field the variable's type does not have.
    #[error("Variable '${variable}' picks unknown field '{field}' of type '{type_name}'")]
    UnknownPickedField {
        variable: String,
        field: String,
        type_name: String,
    },

    /// A selection or projection names a field the type does not declare.
    #[error("Type '{type_name}' has no field '{field}'")]
    UnknownField { type_name: String, field: String },

    /// Flattened convenience parameters collide even after qualification.
    #[error("Operation '{operation}' has conflicting convenience parameter '{name}'")]
    DuplicateParameter { operation: String, name: String },

    /// The schema declares a type of a kind the generator does not support.
    #[error("Unsupported {kind} definition '{name}'")]
    UnsupportedDefinition { name: String, kind: String },

    /// A synthesized name clashes with a declaration already in the schema.
    ///
    /// This occurs when, for example, the schema already declares a type
    /// named `Movie_Data` or a query field named `movies`.
    #[error("Naming collision: synthesized {kind} '{name}' already exists in {owner}")]
    NamingCollision {
        /// What was being synthesized (e.g. "input type", "query field").
        kind: String,
        /// The clashing name.
        name: String,
        /// The schema element that already holds the name.
        owner: String,
    },

    /// An operation without a name cannot be turned into a class model.
    #[error("Anonymous operation in '{path}': every operation must be named")]
    AnonymousOperation { path: String },

    /// The GraphQL parser rejected a document.
    #[error("{0}")]
    ParseError(String),

    /// The GraphQL validator rejected a schema or operation document.
    #[error("{0}")]
    ValidationError(String),

    /// Failed to read an input file
    #[error("Failed to read input file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to generate code
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl GeneratorError {
    pub(crate) fn missing_type(type_name: &str, owner: impl Into<String>) -> Self {
        Self::SchemaConsistency {
            type_name: type_name.to_string(),
            owner: owner.into(),
        }
    }
}
