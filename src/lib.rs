//! # proto-graphene-codegen
//!
//! Generates a Python [graphene](https://graphene-python.org) GraphQL schema
//! from protobuf service descriptors.
//!
//! ## Features
//!
//! - **Type mapping**: every protobuf field becomes a graphene scalar, enum,
//!   object reference or list; 64-bit integers map to a string-backed
//!   `LongString` scalar so no precision is lost
//! - **Input types**: request messages get `...Input` counterparts
//! - **Resolvers**: one resolver per query/mutation that parses the input
//!   into the request message and forwards it to an existing `*_impl` handler
//! - **Schema extensions**: hand-written classes that subclass a generated
//!   class replace every reference to it
//! - **Deterministic output**: identical inputs give byte-identical output
//!
//! ## Main Components
//!
//! - [`OverrideMap`]: resolved schema extensions
//! - [`TypeMapper`]: field descriptor to graphene type expression
//! - [`GenerationState`]: which descriptors to emit, and in which role
//! - [`SchemaSynthesizer`]: builds and renders the [`SchemaDocument`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use proto_graphene_codegen::{generate, load_descriptor_set, CodegenConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = load_descriptor_set("service.desc")?;
//!     let config = CodegenConfig {
//!         queries: vec!["pkg.PointService.GetPoint".to_string()],
//!         mutations: vec!["pkg.PointService.SavePoint".to_string()],
//!         ..CodegenConfig::default()
//!     };
//!     std::fs::write("schema.py", generate(&pool, &config)?)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod extensions;
pub mod generator;
pub mod mapper;
pub mod naming;
pub mod protoc;
pub mod state;
pub mod synthesizer;
pub mod types;

pub use config::{CodegenConfig, PythonModules};
pub use descriptor::{find_method, load_descriptor_set, pool_from_bytes};
pub use document::SchemaDocument;
pub use error::{Error, Result};
pub use extensions::{parse_declarations, ClassDeclaration, OverrideMap};
pub use generator::{generate, generate_for_state, load_overrides, state_from_config};
pub use mapper::{scalar_expr, scalar_for, TypeMapper};
pub use state::GenerationState;
pub use synthesizer::{generate_schema, SchemaSynthesizer};
pub use types::{Scalar, TypeExpr, TypeReference};
