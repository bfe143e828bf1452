//! Field descriptor to graphene type mapping

use crate::descriptor::{field_type, is_repeated};
use crate::error::{Error, Result};
use crate::extensions::OverrideMap;
use crate::naming::{fully_qualified_pascal_name, input_type_name};
use crate::types::{Scalar, TypeExpr, TypeReference};
use prost_reflect::{FieldDescriptor, Kind};
use prost_types::field_descriptor_proto::Type;

/// Fixed protobuf scalar to GraphQL scalar table. There is no default entry:
/// a type missing here fails generation.
pub const SCALAR_TABLE: &[(Type, Scalar)] = &[
    (Type::Bool, Scalar::Boolean),
    (Type::Float, Scalar::Float),
    (Type::Int32, Scalar::Int),
    (Type::Int64, Scalar::LongString),
    (Type::String, Scalar::String),
    (Type::Double, Scalar::Float),
    (Type::Uint32, Scalar::Int),
    (Type::Uint64, Scalar::LongString),
    (Type::Sint32, Scalar::Int),
    (Type::Sint64, Scalar::LongString),
    (Type::Bytes, Scalar::String),
    (Type::Fixed32, Scalar::Int),
    (Type::Fixed64, Scalar::LongString),
    (Type::Sfixed32, Scalar::Int),
    (Type::Sfixed64, Scalar::LongString),
];

/// Look up a protobuf type in [`SCALAR_TABLE`].
pub fn scalar_for(ty: Type) -> Option<Scalar> {
    SCALAR_TABLE
        .iter()
        .find(|(proto, _)| *proto == ty)
        .map(|(_, scalar)| *scalar)
}

/// Scalar type expression for a field of type `ty`, failing on types
/// without a [`SCALAR_TABLE`] entry.
pub fn scalar_expr(field: &str, ty: Type, repeated: bool) -> Result<TypeExpr> {
    let scalar = scalar_for(ty).ok_or_else(|| Error::UnsupportedFieldType {
        field: field.to_string(),
        raw: ty as i32,
    })?;
    Ok(if repeated {
        TypeExpr::ScalarList(scalar)
    } else {
        TypeExpr::Scalar(scalar)
    })
}

/// Maps fields to type expressions, routing named types through the
/// extension overrides.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    overrides: &'a OverrideMap,
}

impl<'a> TypeMapper<'a> {
    pub fn new(overrides: &'a OverrideMap) -> Self {
        Self { overrides }
    }

    /// Graphene type of `field` in an object type (`is_input == false`) or an
    /// input type (`is_input == true`).
    pub fn map_field(&self, field: &FieldDescriptor, is_input: bool) -> Result<TypeExpr> {
        let ty = field_type(field)?;
        let repeated = is_repeated(field);

        match (ty, field.kind()) {
            (Type::Enum, Kind::Enum(enum_desc)) => {
                let name = fully_qualified_pascal_name(enum_desc.full_name());
                Ok(self.wrap_named(self.overrides.reference(&name), repeated, false))
            }
            (Type::Message | Type::Group, Kind::Message(message)) => {
                let name = if is_input {
                    input_type_name(message.full_name())
                } else {
                    fully_qualified_pascal_name(message.full_name())
                };
                Ok(self.wrap_named(self.overrides.reference(&name), repeated, is_input))
            }
            // a named type whose kind disagrees lands here and fails the lookup
            _ => scalar_expr(field.full_name(), ty, repeated),
        }
    }

    fn wrap_named(&self, reference: TypeReference, repeated: bool, is_input: bool) -> TypeExpr {
        if repeated {
            TypeExpr::NonNullList(reference)
        } else if is_input {
            TypeExpr::InputField(reference)
        } else {
            TypeExpr::Field(reference)
        }
    }
}
