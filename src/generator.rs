//! End-to-end generation: configuration in, schema source out.

use crate::config::CodegenConfig;
use crate::descriptor::find_method;
use crate::error::Result;
use crate::extensions::OverrideMap;
use crate::state::GenerationState;
use crate::synthesizer::SchemaSynthesizer;
use prost_reflect::DescriptorPool;
use tracing::{info, warn};

/// Resolve the configured query/mutation names into a complete state.
pub fn state_from_config(pool: &DescriptorPool, config: &CodegenConfig) -> Result<GenerationState> {
    let queries = config
        .queries
        .iter()
        .map(|name| find_method(pool, name))
        .collect::<Result<Vec<_>>>()?;
    let mutations = config
        .mutations
        .iter()
        .map(|name| find_method(pool, name))
        .collect::<Result<Vec<_>>>()?;

    if queries.is_empty() && mutations.is_empty() {
        warn!("No queries or mutations configured; the schema will only contain empty roots");
    }

    Ok(GenerationState::from_operations(queries, mutations))
}

/// Build the override map named by the configuration, or an empty one.
///
/// This is the only file read of a run and happens before any synthesis.
pub fn load_overrides(config: &CodegenConfig) -> Result<OverrideMap> {
    let module = config.modules.extensions_import_name().to_string();
    match config.extension_file() {
        Some(path) => OverrideMap::load(path, module),
        None => {
            info!("No extension file found; generating without overrides");
            Ok(OverrideMap::empty(module))
        }
    }
}

/// Generate the schema for an explicit state.
pub fn generate_for_state(
    state: &GenerationState,
    overrides: &OverrideMap,
    config: &CodegenConfig,
) -> Result<String> {
    if config.validate {
        state.validate()?;
    }
    SchemaSynthesizer::new(overrides, config.modules.clone()).synthesize(state)
}

/// Load overrides, resolve the configured methods and render the schema.
pub fn generate(pool: &DescriptorPool, config: &CodegenConfig) -> Result<String> {
    let overrides = load_overrides(config)?;
    let state = state_from_config(pool, config)?;
    generate_for_state(&state, &overrides, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::fixtures::sample_pool;
    use crate::error::Error;

    #[test]
    fn test_generate_with_extension_file() {
        let dir = tempfile::tempdir().unwrap();
        let ext = dir.path().join("graphql_schema_extensions.py");
        std::fs::write(&ext, "class ShapeExt(PkgShape):\n    pass\n").unwrap();

        let config = CodegenConfig {
            extensions: Some(ext),
            queries: vec!["pkg.PointService.ListShapes".to_string()],
            ..CodegenConfig::default()
        };
        let source = generate(&sample_pool(), &config).unwrap();
        assert!(source.contains("pkg_list_shapes = graphene.Field(PkgShape, input=PkgPointInput())"));
        assert!(source.contains("return server.handlers.list_shapes_impl(request_message)"));
    }

    #[test]
    fn test_unknown_method_is_reported() {
        let config = CodegenConfig {
            extensions: Some("does-not-matter.py".into()),
            queries: vec!["pkg.PointService.Nope".to_string()],
            ..CodegenConfig::default()
        };
        let pool = sample_pool();
        assert!(matches!(
            state_from_config(&pool, &config),
            Err(Error::UnknownMethod(name)) if name == "pkg.PointService.Nope"
        ));
    }

    #[test]
    fn test_missing_explicit_extension_file_is_fatal() {
        let config = CodegenConfig {
            extensions: Some("/definitely/not/here.py".into()),
            ..CodegenConfig::default()
        };
        assert!(matches!(generate(&sample_pool(), &config), Err(Error::Io(_))));
    }

    #[test]
    fn test_validation_can_be_disabled() {
        let pool = sample_pool();
        let mut state = GenerationState::new();
        state.add_type(pool.get_message_by_name("pkg.Shape").unwrap());
        let overrides = OverrideMap::empty("ext");

        let strict = CodegenConfig::default();
        assert!(generate_for_state(&state, &overrides, &strict).is_err());

        let lenient = CodegenConfig {
            validate: false,
            ..CodegenConfig::default()
        };
        let source = generate_for_state(&state, &overrides, &lenient).unwrap();
        assert!(source.contains("color = graphene.Field(PkgColor)"));
    }
}
