//! Error types for factory-call parsing.
//!
//! The message templates here are a contract: downstream tooling matches on
//! them for user-facing diagnostics, so the wording must not drift.

use thiserror::Error;

/// Result type for factory-call operations.
pub type FactoryResult<T> = Result<T, FactoryError>;

/// Errors raised while locating, parsing, or resolving a factory call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactoryError {
    /// First argument of a factory call was not the literal `import.meta.url`.
    #[error("Invalid URL argument in {function} call in {file}. Expected 'import.meta.url' but got: {actual}")]
    InvalidUrlArgument {
        function: String,
        file: String,
        actual: String,
    },

    /// The variants argument was neither an identifier nor an object literal.
    #[error("Invalid variants argument in {function} call in {file}. Expected an identifier or an object literal but got: {actual}")]
    InvalidVariantsArgument {
        function: String,
        file: String,
        actual: String,
    },

    /// A variant name has no matching import binding.
    #[error("Invalid variants argument in {function} call in {file}. Component '{name}' is not imported. Make sure to import it first.")]
    ComponentNotImported {
        function: String,
        file: String,
        name: String,
    },

    /// A variant resolved to a non-relative module and external variants are
    /// not allowed.
    #[error("Invalid variants argument in {function} call in {file}. Component '{name}' is imported from external module '{module}' and external variants are not allowed.")]
    ExternalVariant {
        function: String,
        file: String,
        name: String,
        module: String,
    },

    /// The options argument was not an object literal.
    #[error("Invalid options argument in {function} call in {file}. Expected an object literal but got: {actual}")]
    InvalidOptionsArgument {
        function: String,
        file: String,
        actual: String,
    },

    /// Wrong number of top-level arguments for the parse mode.
    #[error("Invalid arguments in {function} call in {file}. Expected {expected} arguments but got {actual}.")]
    InvalidArity {
        function: String,
        file: String,
        expected: &'static str,
        actual: usize,
    },

    /// More than one factory call in a single file.
    #[error("Multiple factory calls in {file}. Expected at most one create* call but found {count}.")]
    MultipleFactoryCalls { file: String, count: usize },

    /// The opening paren of a factory call never balances.
    #[error("Unbalanced parentheses in {function} call in {file}.")]
    UnbalancedParentheses { function: String, file: String },
}

impl FactoryError {
    /// Stable diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            FactoryError::InvalidUrlArgument { .. } => "E101",
            FactoryError::InvalidVariantsArgument { .. } => "E102",
            FactoryError::InvalidArity { .. } => "E103",
            FactoryError::MultipleFactoryCalls { .. } => "E104",
            FactoryError::UnbalancedParentheses { .. } => "E105",
            FactoryError::InvalidOptionsArgument { .. } => "E106",
            FactoryError::ComponentNotImported { .. } => "E201",
            FactoryError::ExternalVariant { .. } => "E202",
        }
    }
}
