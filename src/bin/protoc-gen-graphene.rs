//! protoc plugin that emits a graphene schema module for the services in the
//! provided `.proto` files.
//!
//! ```text
//! protoc --plugin=protoc-gen-graphene --graphene_out=. \
//!     --graphene_opt=config=codegen.json service.proto
//! ```

use prost::Message;
use std::io::{Read, Write};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the protoc response
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut input = Vec::new();
    std::io::stdin().read_to_end(&mut input)?;

    let response = proto_graphene_codegen::protoc::respond(&input);

    let mut output = Vec::new();
    response.encode(&mut output)?;
    std::io::stdout().write_all(&output)?;
    Ok(())
}
