//! Generator configuration.

use std::path::PathBuf;

use crate::errors::GeneratorError;

/// Package used when none is given: the generated modules live at the
/// crate root.
pub const DEFAULT_PACKAGE: &str = "crate";

/// Inputs and outputs of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// GraphQL SDL file.
    pub schema: PathBuf,
    /// Operation documents, processed in order.
    pub operations: Vec<PathBuf>,
    /// Directory receiving one module per operation plus `mod.rs`.
    pub output_dir: PathBuf,
    /// Rust module path of `output_dir` inside the consuming crate, e.g.
    /// `crate::sdk`. Convenience functions reach nested types through it.
    pub package: String,
    /// Print generated files instead of writing them.
    pub dry_run: bool,
}

impl GeneratorConfig {
    /// Creates a configuration with the default package and no operations.
    pub fn new(schema: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema: schema.into(),
            operations: Vec::new(),
            output_dir: output_dir.into(),
            package: DEFAULT_PACKAGE.to_string(),
            dry_run: false,
        }
    }

    #[must_use]
    pub fn with_operations<I, P>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.operations.extend(operations.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Checks the configuration before any file is read.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ConfigError`] if no operation documents are
    /// given or `package` is not a `::`-separated path of identifiers.
    ///
    /// ## Examples
    ///
    /// ```
    /// use crudkit_gen::config::GeneratorConfig;
    ///
    /// let config = GeneratorConfig::new("schema.graphql", "src/sdk")
    ///     .with_operations(["ops.graphql"])
    ///     .with_package("crate::sdk");
    /// assert!(config.validate().is_ok());
    ///
    /// let bad = config.clone().with_package("crate::2fast");
    /// assert!(bad.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.operations.is_empty() {
            return Err(GeneratorError::ConfigError(
                "At least one operation document is required".to_string(),
            ));
        }
        if !is_module_path(&self.package) {
            return Err(GeneratorError::ConfigError(format!(
                "Package '{}' is not a Rust module path",
                self.package
            )));
        }
        Ok(())
    }
}

fn is_module_path(path: &str) -> bool {
    path.split("::").enumerate().all(|(index, segment)| {
        let mut chars = segment.chars();
        let starts_well = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid = starts_well && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        let path_keyword = matches!(segment, "crate" | "self" | "super");
        valid && segment != "_" && (index == 0 || !path_keyword || segment == "super")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GeneratorConfig {
        GeneratorConfig::new("schema.graphql", "out").with_operations(["ops.graphql"])
    }

    #[test]
    fn defaults_to_crate_package() {
        let config = config();
        assert_eq!(config.package, "crate");
        assert!(!config.dry_run);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn operations_are_required() {
        let config = GeneratorConfig::new("schema.graphql", "out");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("operation document"));
    }

    #[test]
    fn package_paths_are_checked() {
        for good in ["crate", "crate::sdk", "my_app::generated", "super::super::gql"] {
            assert!(config().with_package(good).validate().is_ok(), "{good}");
        }
        for bad in ["", "crate::", "sdk-client", "a::crate", "crate::9"] {
            assert!(config().with_package(bad).validate().is_err(), "{bad}");
        }
    }
}
