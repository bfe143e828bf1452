//! Identifier casing and generated-name derivation.
//!
//! All functions here are pure and ASCII-only, so the same descriptors always
//! produce the same names regardless of locale.

use crate::descriptor::package_name;
use prost_reflect::MethodDescriptor;

/// Separator used when flattening a dotted protobuf name.
pub const NAME_SEPARATOR: char = '_';

/// Suffix appended to the name of every generated input type.
pub const INPUT_SUFFIX: &str = "Input";

/// Suffix of the handler function a resolver dispatches to.
pub const HANDLER_SUFFIX: &str = "_impl";

/// Convert `snake_case` (or mixed `pkg_Message`) to `PascalCase`.
///
/// Each `_`-separated segment gets its first character upper-cased; the rest
/// of the segment is kept as is, so `pkg_RunInfo` becomes `PkgRunInfo`.
pub fn snake_to_pascal(input: &str) -> String {
    input
        .split(NAME_SEPARATOR)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Convert `camelCase` or `PascalCase` to `snake_case`.
///
/// Acronyms stay together (`HTTPServer` -> `http_server`). Strings without
/// upper-case ASCII letters are returned unchanged.
pub fn camel_to_snake(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut result = String::with_capacity(input.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars
                    .get(i + 1)
                    .map(|n| n.is_ascii_lowercase())
                    .unwrap_or(false);
                let boundary = prev.is_ascii_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_ascii_uppercase() && next_is_lower);
                if boundary {
                    result.push('_');
                }
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

/// Flatten a dotted full name into a Pascal-case type name.
///
/// `pkg.Point` -> `PkgPoint`, `pkg.Outer.Inner` -> `PkgOuterInner`.
pub fn fully_qualified_pascal_name(full_name: &str) -> String {
    snake_to_pascal(&full_name.replace('.', &NAME_SEPARATOR.to_string()))
}

/// Name of the generated input type for a message full name.
pub fn input_type_name(full_name: &str) -> String {
    format!("{}{}", fully_qualified_pascal_name(full_name), INPUT_SUFFIX)
}

/// `{package}_{snake_case(method)}` from raw parts.
///
/// Dots in nested packages are flattened so the result is a single
/// identifier. An empty package yields just the snake-cased method name.
pub fn qualified_operation_name(package: &str, method_name: &str) -> String {
    let method = camel_to_snake(method_name);
    if package.is_empty() {
        method
    } else {
        format!(
            "{}{}{}",
            package.replace('.', &NAME_SEPARATOR.to_string()),
            NAME_SEPARATOR,
            method
        )
    }
}

/// Unique field name of a query/mutation and the resolver's binding key.
pub fn method_qualified_name(method: &MethodDescriptor) -> String {
    qualified_operation_name(&package_name(method), method.name())
}

/// Name of the external handler a method's resolver dispatches to.
pub fn handler_name(method_name: &str) -> String {
    format!("{}{}", camel_to_snake(method_name), HANDLER_SUFFIX)
}

/// Name of the resolver function bound to an operation.
pub fn resolver_name(operation: &str) -> String {
    format!("resolve_{operation}")
}
