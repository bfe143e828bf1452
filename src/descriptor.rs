//! Read-only access to the protobuf descriptor graph.
//!
//! Descriptors come from `prost-reflect`; this module only adds loading
//! helpers and the few projections the generator needs.

use crate::error::{Error, Result};
use prost::Message;
use prost_reflect::{Cardinality, DescriptorPool, FieldDescriptor, Kind, MethodDescriptor};
use prost_types::field_descriptor_proto::Type;
use std::path::Path;
use tracing::{debug, info};

/// `FileDescriptorSet` with files kept as raw bytes so that custom options
/// survive the round trip into the pool.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawFileDescriptorSet {
    #[prost(bytes, repeated, tag = "1")]
    pub file: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
}

/// Decode a serialized `FileDescriptorSet`.
pub fn pool_from_bytes(bytes: &[u8]) -> Result<DescriptorPool> {
    let pool = DescriptorPool::decode(bytes)?;
    debug!(
        files = pool.files().count(),
        messages = pool.all_messages().count(),
        "Decoded descriptor pool"
    );
    Ok(pool)
}

/// Build a pool from individually serialized `FileDescriptorProto`s.
pub fn pool_from_files(files: &[Vec<u8>]) -> Result<DescriptorPool> {
    let fds = RawFileDescriptorSet {
        file: files.to_vec(),
    };
    pool_from_bytes(&fds.encode_to_vec())
}

/// Load a descriptor set written by `protoc --descriptor_set_out`.
pub fn load_descriptor_set<P: AsRef<Path>>(path: P) -> Result<DescriptorPool> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    info!(path = %path.display(), bytes = bytes.len(), "Loading descriptor set");
    pool_from_bytes(&bytes)
}

/// Look up a method by its `package.Service.Method` full name.
pub fn find_method(pool: &DescriptorPool, full_name: &str) -> Result<MethodDescriptor> {
    let name = full_name.trim_start_matches('.');
    let (service, method) = name
        .rsplit_once('.')
        .ok_or_else(|| Error::UnknownMethod(full_name.to_string()))?;

    let service = pool
        .get_service_by_name(service)
        .ok_or_else(|| Error::UnknownMethod(full_name.to_string()))?;
    let found = service.methods().find(|m| m.name() == method);
    found.ok_or_else(|| Error::UnknownMethod(full_name.to_string()))
}

/// Convert a raw protobuf type number, failing on values outside the fixed
/// enumeration.
pub fn type_from_raw(raw: i32, field: &str) -> Result<Type> {
    Type::try_from(raw).map_err(|_| Error::UnsupportedFieldType {
        field: field.to_string(),
        raw,
    })
}

/// Declared wire type of a field, `group` included.
pub fn field_type(field: &FieldDescriptor) -> Result<Type> {
    if let Some(raw) = field.field_descriptor_proto().r#type {
        return type_from_raw(raw, field.full_name());
    }

    Ok(match field.kind() {
        Kind::Double => Type::Double,
        Kind::Float => Type::Float,
        Kind::Int32 => Type::Int32,
        Kind::Int64 => Type::Int64,
        Kind::Uint32 => Type::Uint32,
        Kind::Uint64 => Type::Uint64,
        Kind::Sint32 => Type::Sint32,
        Kind::Sint64 => Type::Sint64,
        Kind::Fixed32 => Type::Fixed32,
        Kind::Fixed64 => Type::Fixed64,
        Kind::Sfixed32 => Type::Sfixed32,
        Kind::Sfixed64 => Type::Sfixed64,
        Kind::Bool => Type::Bool,
        Kind::String => Type::String,
        Kind::Bytes => Type::Bytes,
        Kind::Message(_) if field.is_group() => Type::Group,
        Kind::Message(_) => Type::Message,
        Kind::Enum(_) => Type::Enum,
    })
}

/// Whether a field carries the `repeated` label. Map fields count as
/// repeated entries.
pub fn is_repeated(field: &FieldDescriptor) -> bool {
    field.cardinality() == Cardinality::Repeated
}

/// Package of the service declaring `method`.
pub fn package_name(method: &MethodDescriptor) -> String {
    method.parent_service().package_name().to_string()
}

/// Python module generated for the method's originating file:
/// `service/runs.proto` -> `service.runs_pb2`.
pub fn proto_module(method: &MethodDescriptor) -> String {
    let file = method.parent_service().parent_file();
    let stem = file.name().strip_suffix(".proto").unwrap_or(file.name());
    format!("{}_pb2", stem.replace(['/', '\\'], "."))
}

/// Class of the request message within its generated module, e.g.
/// `GetPoint` or `Outer.Inner` for nested messages.
pub fn request_class(method: &MethodDescriptor) -> String {
    let input = method.input();
    let package = input.package_name();
    let full = input.full_name();
    if package.is_empty() {
        full.to_string()
    } else {
        full.strip_prefix(package)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(full)
            .to_string()
    }
}
