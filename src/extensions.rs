//! Hand-written schema extensions.
//!
//! The extension file is a Python module whose classes subclass generated
//! schema classes, e.g.
//!
//! ```python
//! class PointExtension(PkgPoint):
//!     norm = graphene.Float()
//! ```
//!
//! Every reference the generator would emit to `PkgPoint` is rewired to
//! `graphql_schema_extensions.PointExtension`. Overrides are a single level:
//! an extension class is never itself looked up again.
//!
//! The file is parsed with the tree-sitter Python grammar; only
//! `class_definition` nodes and their superclass lists are inspected.

use crate::error::{Error, Result};
use crate::types::TypeReference;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tree_sitter::{Node, Parser};

/// One base expression in a class header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseExpr {
    /// A bare identifier: `class A(Base)`
    Name(String),
    /// Anything computed: attribute access, subscripts, calls, `*args`
    Dynamic(String),
}

/// A `class` statement and the classes declared inside its body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDeclaration {
    pub name: String,
    pub bases: Vec<BaseExpr>,
    /// 1-based line of the `class` keyword
    pub line: usize,
    pub nested: Vec<ClassDeclaration>,
}

impl ClassDeclaration {
    /// Bases given as plain names
    pub fn simple_bases(&self) -> impl Iterator<Item = &str> {
        self.bases.iter().filter_map(|b| match b {
            BaseExpr::Name(name) => Some(name.as_str()),
            BaseExpr::Dynamic(_) => None,
        })
    }
}

fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or_default()
}

fn base_expr(node: Node<'_>, source: &str) -> Option<BaseExpr> {
    match node.kind() {
        "identifier" => Some(BaseExpr::Name(text(node, source).to_string())),
        // `class A((Base))` names `Base`
        "parenthesized_expression" => {
            let mut cursor = node.walk();
            let inner = node
                .named_children(&mut cursor)
                .find(|child| child.kind() != "comment");
            inner.and_then(|inner| base_expr(inner, source))
        }
        "keyword_argument" | "dictionary_splat" | "comment" => None,
        _ => Some(BaseExpr::Dynamic(text(node, source).to_string())),
    }
}

fn class_declaration(node: Node<'_>, source: &str) -> ClassDeclaration {
    let name = node
        .child_by_field_name("name")
        .map(|name| text(name, source).to_string())
        .unwrap_or_default();

    let mut bases = Vec::new();
    if let Some(args) = node.child_by_field_name("superclasses") {
        let mut cursor = args.walk();
        for arg in args.named_children(&mut cursor) {
            bases.extend(base_expr(arg, source));
        }
    }

    let mut nested = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        collect_classes(body, source, &mut nested);
    }

    ClassDeclaration {
        name,
        bases,
        line: node.start_position().row + 1,
        nested,
    }
}

/// Pre-order walk in document order. A class found below another class's
/// body (methods included) becomes one of its `nested` declarations.
fn collect_classes(node: Node<'_>, source: &str, out: &mut Vec<ClassDeclaration>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "class_definition" {
            out.push(class_declaration(child, source));
        } else {
            collect_classes(child, source, out);
        }
    }
}

fn first_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let broken: Vec<Node<'t>> = node
        .children(&mut cursor)
        .filter(|child| child.has_error())
        .collect();
    broken.into_iter().find_map(first_error)
}

/// Parse the class declarations of a Python source file into a tree.
///
/// `file` is only used for diagnostics. Source that does not parse as Python
/// is rejected with [`Error::ExtensionSyntax`].
pub fn parse_declarations(source: &str, file: &Path) -> Result<Vec<ClassDeclaration>> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| Error::ExtensionParser(e.to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::ExtensionParser(format!("no syntax tree for {}", file.display())))?;

    let root = tree.root_node();
    if root.has_error() {
        let line = first_error(root)
            .map(|node| node.start_position().row + 1)
            .unwrap_or(1);
        return Err(Error::ExtensionSyntax {
            file: file.to_path_buf(),
            line,
        });
    }

    let mut decls = Vec::new();
    collect_classes(root, source, &mut decls);
    Ok(decls)
}

/// Default location of the extension file, relative to the working directory.
pub const DEFAULT_EXTENSION_FILE: &str = "server/graphql/graphql_schema_extensions.py";

/// Frozen mapping from generated class name to its single override
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideMap {
    module: String,
    overrides: BTreeMap<String, String>,
}

impl OverrideMap {
    /// A map with no overrides. Every name resolves to itself.
    pub fn empty(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            overrides: BTreeMap::new(),
        }
    }

    /// Build the map from extension source text.
    ///
    /// `file` is only used for diagnostics. A class extended by more than one
    /// declaration aborts with [`Error::DuplicateExtension`].
    pub fn from_source(source: &str, file: &Path, module: impl Into<String>) -> Result<Self> {
        let mut map = Self::empty(module);
        let mut declared_at: BTreeMap<String, usize> = BTreeMap::new();
        map.collect(&parse_declarations(source, file)?, file, &mut declared_at)?;
        debug!(
            file = %file.display(),
            overrides = map.overrides.len(),
            "Resolved schema extensions"
        );
        Ok(map)
    }

    /// Read and resolve the extension file at `path`.
    pub fn load<P: AsRef<Path>>(path: P, module: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let map = Self::from_source(&source, path, module)?;
        info!(
            path = %path.display(),
            overrides = map.len(),
            "Loaded schema extensions"
        );
        Ok(map)
    }

    fn collect(
        &mut self,
        decls: &[ClassDeclaration],
        file: &Path,
        declared_at: &mut BTreeMap<String, usize>,
    ) -> Result<()> {
        for decl in decls {
            for base in decl.simple_bases() {
                if let Some(first) = declared_at.get(base) {
                    tracing::error!(
                        base,
                        first_line = first,
                        second_line = decl.line,
                        "Class extended more than once"
                    );
                    return Err(Error::DuplicateExtension {
                        base: base.to_string(),
                        file: PathBuf::from(file),
                    });
                }
                declared_at.insert(base.to_string(), decl.line);
                self.overrides.insert(base.to_string(), decl.name.clone());
            }
            self.collect(&decl.nested, file, declared_at)?;
        }
        Ok(())
    }

    /// Override name for `name`, or `name` itself when it is not extended.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.overrides.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Like [`OverrideMap::resolve`] but keeps track of where the class lives.
    pub fn reference(&self, name: &str) -> TypeReference {
        match self.overrides.get(name) {
            Some(ext) => TypeReference::Extension {
                module: self.module.clone(),
                name: ext.clone(),
            },
            None => TypeReference::Generated(name.to_string()),
        }
    }

    /// Import name of the extension module.
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
