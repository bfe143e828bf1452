//! Error types for the schema generator

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the generator
///
/// Every variant is fatal for a generation run. None of them are retried:
/// the same inputs always produce the same error, so the only fix is to
/// change the descriptor set, the extension file or the configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// A generated type is overridden by more than one extension class
    #[error(
        "{base} is being extended more than once in {}. \
         A GraphQL schema class should not be extended more than once.",
        .file.display()
    )]
    DuplicateExtension {
        /// Name of the generated class that is extended twice
        base: String,
        /// Extension file that declares the overrides
        file: PathBuf,
    },

    /// The extension file is not valid Python
    #[error("Invalid Python in {} near line {line}", .file.display())]
    ExtensionSyntax {
        /// Extension file that failed to parse
        file: PathBuf,
        /// 1-based line of the first syntax error
        line: usize,
    },

    /// The Python parser could not be set up or gave no tree
    #[error("Python parser error: {0}")]
    ExtensionParser(String),

    /// A field's protobuf type has no GraphQL mapping
    #[error("Unsupported protobuf type {raw} on field {field}")]
    UnsupportedFieldType {
        /// Fully-qualified field name
        field: String,
        /// Raw protobuf type number
        raw: i32,
    },

    /// An emitted declaration references a type that is not being emitted
    #[error("{referenced} is referenced by {by} but is not part of the {category} set")]
    IncompleteState {
        /// Generated name of the missing type
        referenced: String,
        /// Declaration holding the dangling reference
        by: String,
        /// Emission set the type should belong to
        category: &'static str,
    },

    /// Two methods resolve to the same operation name
    #[error("Operation {0} is generated by more than one method")]
    DuplicateOperation(String),

    /// A configured method does not exist in the descriptor set
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    /// Descriptor pool construction errors
    #[error("Descriptor error: {0}")]
    Descriptor(#[from] prost_reflect::DescriptorError),

    /// Protobuf decoding errors
    #[error("Decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Invalid configuration or plugin parameter
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Short machine-readable code for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            Error::DuplicateExtension { .. } => "DUPLICATE_EXTENSION",
            Error::ExtensionSyntax { .. } => "EXTENSION_SYNTAX",
            Error::ExtensionParser(_) => "EXTENSION_PARSER",
            Error::UnsupportedFieldType { .. } => "UNSUPPORTED_FIELD_TYPE",
            Error::IncompleteState { .. } => "INCOMPLETE_STATE",
            Error::DuplicateOperation(_) => "DUPLICATE_OPERATION",
            Error::UnknownMethod(_) => "UNKNOWN_METHOD",
            Error::Descriptor(_) => "DESCRIPTOR_ERROR",
            Error::Decode(_) => "DECODE_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Whether the error comes from the extension file or configuration
    /// rather than from the descriptors.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Error::DuplicateExtension { .. }
                | Error::ExtensionSyntax { .. }
                | Error::Config(_)
                | Error::Serialization(_)
        )
    }
}
