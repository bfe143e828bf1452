//! protoc plugin protocol.
//!
//! protoc writes a `CodeGeneratorRequest` to the plugin's stdin and expects a
//! `CodeGeneratorResponse` on stdout. Generation failures are reported in
//! the response's `error` field so protoc can show them to the user.

use crate::config::CodegenConfig;
use crate::descriptor::pool_from_files;
use crate::error::Result;
use crate::generator::generate;
use prost::Message;
use prost_types::compiler::{code_generator_response, CodeGeneratorResponse};
use tracing::{error, info};

/// `CodeGeneratorRequest` keeping each `proto_file` as raw bytes so custom
/// options are not lost before the descriptor pool sees them.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawCodeGeneratorRequest {
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: ::prost::alloc::vec::Vec<String>,
    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,
    #[prost(bytes, repeated, tag = "15")]
    pub proto_file: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
}

/// Run generation for a decoded request.
pub fn generate_files(request: &RawCodeGeneratorRequest) -> Result<Vec<code_generator_response::File>> {
    let config = CodegenConfig::default().with_parameters(request.parameter.as_deref())?;
    let pool = pool_from_files(&request.proto_file)?;
    info!(
        files = ?request.file_to_generate,
        queries = config.queries.len(),
        mutations = config.mutations.len(),
        "Generating graphene schema"
    );

    let content = generate(&pool, &config)?;
    Ok(vec![code_generator_response::File {
        name: Some(config.output_file().to_string()),
        insertion_point: None,
        content: Some(content),
        generated_code_info: None,
    }])
}

/// Decode a serialized request and build the response. Never fails: errors
/// end up in `CodeGeneratorResponse::error`.
pub fn respond(input: &[u8]) -> CodeGeneratorResponse {
    let result = RawCodeGeneratorRequest::decode(input)
        .map_err(Into::into)
        .and_then(|request| generate_files(&request));

    match result {
        Ok(file) => CodeGeneratorResponse {
            file,
            ..Default::default()
        },
        Err(e) => {
            if e.is_configuration_error() {
                error!(code = e.code(), "Invalid generator configuration: {e}");
            } else {
                error!(code = e.code(), "Schema generation failed: {e}");
            }
            CodeGeneratorResponse {
                error: Some(e.to_string()),
                ..Default::default()
            }
        }
    }
}
