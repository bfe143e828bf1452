//! Type expressions of the generated graphene schema

use std::fmt;

/// Python module prefix of the graphene runtime.
pub const GRAPHENE: &str = "graphene";

/// Custom scalar carrying 64-bit integers as strings.
pub const LONG_STRING: &str = "LongString";

/// GraphQL scalar a protobuf scalar field maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Boolean,
    Float,
    Int,
    String,
    /// GraphQL `Int` is 32-bit, so every 64-bit integer variant is carried
    /// as a string to avoid precision loss.
    LongString,
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Boolean => write!(f, "{GRAPHENE}.Boolean"),
            Scalar::Float => write!(f, "{GRAPHENE}.Float"),
            Scalar::Int => write!(f, "{GRAPHENE}.Int"),
            Scalar::String => write!(f, "{GRAPHENE}.String"),
            Scalar::LongString => f.write_str(LONG_STRING),
        }
    }
}

/// Reference to a named schema type after extension resolution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeReference {
    /// A class emitted into the generated document
    Generated(String),
    /// A hand-written class from the extension module
    Extension {
        /// Import name of the extension module
        module: String,
        /// Overriding class name
        name: String,
    },
}

impl TypeReference {
    /// Bare class name, without module qualification
    pub fn name(&self) -> &str {
        match self {
            TypeReference::Generated(name) => name,
            TypeReference::Extension { name, .. } => name,
        }
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeReference::Generated(name) => f.write_str(name),
            TypeReference::Extension { module, name } => write!(f, "{module}.{name}"),
        }
    }
}

/// Right-hand side of a generated field declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    /// `graphene.Int()`
    Scalar(Scalar),
    /// `graphene.List(graphene.Int)`
    ScalarList(Scalar),
    /// `graphene.Field(T)`
    Field(TypeReference),
    /// `graphene.InputField(T)`
    InputField(TypeReference),
    /// `graphene.List(graphene.NonNull(T))`
    NonNullList(TypeReference),
    /// `graphene.Boolean(description=...)` placeholder for empty types
    Placeholder,
}

/// Description attached to the placeholder field of empty types.
pub const PLACEHOLDER_DESCRIPTION: &str =
    "Dummy field required because GraphQL does not support empty types.";

/// Name of the placeholder field of empty types.
pub const PLACEHOLDER_FIELD: &str = "dummy";

impl TypeExpr {
    /// Whether the expression wraps its base type in a list
    pub fn is_list(&self) -> bool {
        matches!(self, TypeExpr::ScalarList(_) | TypeExpr::NonNullList(_))
    }

    /// Referenced named type, if any
    pub fn reference(&self) -> Option<&TypeReference> {
        match self {
            TypeExpr::Field(r) | TypeExpr::InputField(r) | TypeExpr::NonNullList(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Scalar(s) => write!(f, "{s}()"),
            TypeExpr::ScalarList(s) => write!(f, "{GRAPHENE}.List({s})"),
            TypeExpr::Field(r) => write!(f, "{GRAPHENE}.Field({r})"),
            TypeExpr::InputField(r) => write!(f, "{GRAPHENE}.InputField({r})"),
            TypeExpr::NonNullList(r) => write!(f, "{GRAPHENE}.List({GRAPHENE}.NonNull({r}))"),
            TypeExpr::Placeholder => write!(
                f,
                "{}(description='{PLACEHOLDER_DESCRIPTION}')",
                Scalar::Boolean
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(TypeExpr::Scalar(Scalar::Int).to_string(), "graphene.Int()");
        assert_eq!(TypeExpr::Scalar(Scalar::LongString).to_string(), "LongString()");
        assert_eq!(
            TypeExpr::ScalarList(Scalar::String).to_string(),
            "graphene.List(graphene.String)"
        );
    }

    #[test]
    fn test_reference_rendering() {
        let generated = TypeReference::Generated("PkgPoint".to_string());
        let extension = TypeReference::Extension {
            module: "graphql_schema_extensions".to_string(),
            name: "PointExtension".to_string(),
        };

        assert_eq!(
            TypeExpr::Field(generated.clone()).to_string(),
            "graphene.Field(PkgPoint)"
        );
        assert_eq!(
            TypeExpr::InputField(extension.clone()).to_string(),
            "graphene.InputField(graphql_schema_extensions.PointExtension)"
        );
        assert_eq!(
            TypeExpr::NonNullList(generated).to_string(),
            "graphene.List(graphene.NonNull(PkgPoint))"
        );
        assert_eq!(extension.name(), "PointExtension");
    }

    #[test]
    fn test_placeholder_rendering() {
        assert_eq!(
            TypeExpr::Placeholder.to_string(),
            "graphene.Boolean(description='Dummy field required because GraphQL does not support empty types.')"
        );
    }
}
