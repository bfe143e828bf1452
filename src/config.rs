//! Generator configuration.
//!
//! Configuration comes from an optional JSON file and, for the protoc
//! plugin, from the `--graphene_opt` parameter string. Parameter values
//! override file values.
//!
//! ```json
//! {
//!   "extensions": "server/graphql/graphql_schema_extensions.py",
//!   "queries": ["pkg.PointService.GetPoint"],
//!   "mutations": ["pkg.PointService.SavePoint"],
//!   "modules": { "handlers": "server.handlers" }
//! }
//! ```

use crate::error::{Error, Result};
use crate::extensions::DEFAULT_EXTENSION_FILE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Python modules the generated document imports from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonModules {
    /// Package containing the `*_pb2` modules generated by protoc
    pub proto: String,
    /// Module exposing the `*_impl` handler functions
    pub handlers: String,
    /// Module holding the hand-written extension classes
    pub extensions: String,
    /// Module defining the `LongString` scalar
    pub scalars: String,
    /// Module defining `parse_dict(dict, message)`
    pub parse_dict: String,
}

impl Default for PythonModules {
    fn default() -> Self {
        Self {
            proto: "protos".to_string(),
            handlers: "server.handlers".to_string(),
            extensions: "server.graphql.graphql_schema_extensions".to_string(),
            scalars: "server.graphql.graphql_custom_scalars".to_string(),
            parse_dict: "utils.proto_json_utils".to_string(),
        }
    }
}

impl PythonModules {
    /// Name the extension module is imported as (its last path segment).
    pub fn extensions_import_name(&self) -> &str {
        self.extensions
            .rsplit_once('.')
            .map(|(_, leaf)| leaf)
            .unwrap_or(&self.extensions)
    }
}

fn default_validate() -> bool {
    true
}

/// Full generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Path of the extension file; no overrides are applied when it does
    /// not exist and was not set explicitly.
    #[serde(default)]
    pub extensions: Option<PathBuf>,

    /// Methods exposed as queries, by `package.Service.Method`
    #[serde(default)]
    pub queries: Vec<String>,

    /// Methods exposed as mutations, by `package.Service.Method`
    #[serde(default)]
    pub mutations: Vec<String>,

    #[serde(default)]
    pub modules: PythonModules,

    /// Reject incomplete states instead of emitting dangling references
    #[serde(default = "default_validate")]
    pub validate: bool,

    /// File name of the generated document (protoc plugin only)
    #[serde(default)]
    pub output: Option<String>,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            extensions: None,
            queries: Vec::new(),
            mutations: Vec::new(),
            modules: PythonModules::default(),
            validate: true,
            output: None,
        }
    }
}

/// Default file name of the generated document.
pub const DEFAULT_OUTPUT_FILE: &str = "schema.py";

impl CodegenConfig {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Extension file to load, if any.
    ///
    /// An explicitly configured path must exist; the default location is
    /// only used when present.
    pub fn extension_file(&self) -> Option<PathBuf> {
        match &self.extensions {
            Some(path) => Some(path.clone()),
            None => {
                let default = PathBuf::from(DEFAULT_EXTENSION_FILE);
                default.exists().then_some(default)
            }
        }
    }

    pub fn output_file(&self) -> &str {
        self.output.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE)
    }

    /// Apply a protoc plugin parameter string such as
    /// `extensions=ext.py,queries=pkg.Svc.Get;pkg.Svc.List,validate=false`.
    ///
    /// A `config=<path>` entry loads that file first; the remaining entries
    /// override it regardless of their position.
    pub fn with_parameters(self, param: Option<&str>) -> Result<Self> {
        let Some(param) = param else {
            return Ok(self);
        };

        let pairs: Vec<(&str, &str)> = param
            .split(',')
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(|p| {
                p.split_once('=')
                    .map(|(k, v)| (k.trim(), v.trim()))
                    .ok_or_else(|| Error::Config(format!("expected key=value, got '{p}'")))
            })
            .collect::<Result<_>>()?;

        let mut config = match pairs.iter().find(|(k, _)| *k == "config") {
            Some((_, path)) => Self::from_json_file(path)?,
            None => self,
        };

        for (key, value) in pairs {
            match key {
                "config" => {}
                "extensions" => config.extensions = Some(PathBuf::from(value)),
                "queries" => config.queries = split_list(value),
                "mutations" => config.mutations = split_list(value),
                "output" => config.output = Some(value.to_string()),
                "validate" => {
                    config.validate = value
                        .parse()
                        .map_err(|_| Error::Config(format!("invalid validate value '{value}'")))?
                }
                "proto_module" => config.modules.proto = value.to_string(),
                "handlers_module" => config.modules.handlers = value.to_string(),
                "extensions_module" => config.modules.extensions = value.to_string(),
                "scalars_module" => config.modules.scalars = value.to_string(),
                "parse_dict_module" => config.modules.parse_dict = value.to_string(),
                other => return Err(Error::Config(format!("unknown parameter '{other}'"))),
            }
        }

        Ok(config)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CodegenConfig::default();
        assert!(config.validate);
        assert_eq!(config.output_file(), DEFAULT_OUTPUT_FILE);
        assert_eq!(
            config.modules.extensions_import_name(),
            "graphql_schema_extensions"
        );
    }

    #[test]
    fn test_from_json_partial() {
        let config = CodegenConfig::from_json_str(
            r#"{
                "queries": ["pkg.PointService.GetPoint"],
                "modules": { "handlers": "app.handlers" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.queries, vec!["pkg.PointService.GetPoint"]);
        assert!(config.mutations.is_empty());
        assert!(config.validate);
        assert_eq!(config.modules.handlers, "app.handlers");
        assert_eq!(config.modules.proto, "protos");
    }

    #[test]
    fn test_from_json_invalid() {
        let err = CodegenConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_parameters_override() {
        let config = CodegenConfig::default()
            .with_parameters(Some(
                "extensions=ext.py, queries=a.S.Get;a.S.List ,mutations=a.S.Save,validate=false,handlers_module=h",
            ))
            .unwrap();
        assert_eq!(config.extensions, Some(PathBuf::from("ext.py")));
        assert_eq!(config.queries, vec!["a.S.Get", "a.S.List"]);
        assert_eq!(config.mutations, vec!["a.S.Save"]);
        assert!(!config.validate);
        assert_eq!(config.modules.handlers, "h");
    }

    #[test]
    fn test_parameters_with_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codegen.json");
        std::fs::write(
            &path,
            r#"{ "queries": ["a.S.Get"], "mutations": ["a.S.Save"] }"#,
        )
        .unwrap();

        let param = format!("mutations=a.S.Other,config={}", path.display());
        let config = CodegenConfig::default()
            .with_parameters(Some(&param))
            .unwrap();
        assert_eq!(config.queries, vec!["a.S.Get"]);
        assert_eq!(config.mutations, vec!["a.S.Other"]);
    }

    #[test]
    fn test_bad_parameters() {
        assert!(CodegenConfig::default()
            .with_parameters(Some("nonsense"))
            .is_err());
        assert!(CodegenConfig::default()
            .with_parameters(Some("colour=blue"))
            .is_err());
        assert!(CodegenConfig::default()
            .with_parameters(Some("validate=maybe"))
            .is_err());
        assert!(CodegenConfig::default().with_parameters(None).is_ok());
    }
}
