//! Standalone generator working from a serialized `FileDescriptorSet`
//! (`protoc --include_imports --descriptor_set_out=service.desc ...`).

use anyhow::Context;
use clap::Parser;
use proto_graphene_codegen::{generate, load_descriptor_set, CodegenConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    /// Serialized FileDescriptorSet
    #[clap(short, long)]
    descriptor_set: PathBuf,

    /// JSON configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Python file with the schema extension classes
    #[clap(short, long)]
    extensions: Option<PathBuf>,

    /// Method exposed as a query (`package.Service.Method`), repeatable
    #[clap(short, long = "query")]
    queries: Vec<String>,

    /// Method exposed as a mutation (`package.Service.Method`), repeatable
    #[clap(short, long = "mutation")]
    mutations: Vec<String>,

    /// Output file; stdout when omitted
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Emit dangling references instead of rejecting incomplete input
    #[clap(long)]
    no_validate: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<(PathBuf, Option<PathBuf>, CodegenConfig)> {
        let mut config = match &self.config {
            Some(path) => CodegenConfig::from_json_file(path)
                .with_context(|| format!("failed to read config {}", path.display()))?,
            None => CodegenConfig::default(),
        };
        if self.extensions.is_some() {
            config.extensions = self.extensions;
        }
        config.queries.extend(self.queries);
        config.mutations.extend(self.mutations);
        if self.no_validate {
            config.validate = false;
        }
        Ok((self.descriptor_set, self.output, config))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let (descriptor_set, output, config) = Args::parse().into_config()?;

    let pool = load_descriptor_set(&descriptor_set)
        .with_context(|| format!("failed to load {}", descriptor_set.display()))?;
    let schema = generate(&pool, &config)?;

    match output {
        Some(path) => std::fs::write(&path, schema)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{schema}"),
    }
    Ok(())
}
