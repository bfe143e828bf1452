//! Declaration tree of the generated schema module and its rendering.
//!
//! The synthesizer fills a [`SchemaDocument`]; `Display` turns it into Python
//! source. Sections always render in the same order: header imports, enums,
//! object types, input types, the query root and the mutation root, each
//! root followed by its resolvers.

use crate::config::PythonModules;
use crate::types::{TypeExpr, GRAPHENE, LONG_STRING, PLACEHOLDER_FIELD};
use std::collections::BTreeSet;
use std::fmt;

const INDENT: &str = "    ";
const INDENT2: &str = "        ";

/// `class Name(graphene.Enum)` with one member per value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    pub name: String,
    pub members: Vec<String>,
}

/// `name = <type expression>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeExpr,
}

/// An object or input class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
}

impl ClassDecl {
    /// Build a class, adding the placeholder field when `fields` is empty
    /// since GraphQL rejects types without fields.
    pub fn new(name: impl Into<String>, mut fields: Vec<FieldDecl>) -> Self {
        if fields.is_empty() {
            fields.push(FieldDecl {
                name: PLACEHOLDER_FIELD.to_string(),
                ty: TypeExpr::Placeholder,
            });
        }
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// A field on the query or mutation root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDecl {
    /// `{package}_{method}`
    pub name: String,
    /// Object type returned by the operation
    pub output: String,
    /// Input type of the `input` argument
    pub input: String,
}

/// Resolver glue forwarding an operation to its handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverDecl {
    /// Function name, `resolve_{operation}`
    pub name: String,
    /// Module of the request message relative to the proto package
    pub proto_module: String,
    /// Request message class within `proto_module`
    pub request_class: String,
    /// Handler function within the handlers module
    pub handler: String,
}

/// `QueryType` or `MutationType`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootDecl {
    pub name: &'static str,
    pub operations: Vec<OperationDecl>,
    pub resolvers: Vec<ResolverDecl>,
}

impl RootDecl {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            operations: Vec::new(),
            resolvers: Vec::new(),
        }
    }
}

/// The whole generated module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDocument {
    pub modules: PythonModules,
    pub enums: Vec<EnumDecl>,
    pub objects: Vec<ClassDecl>,
    pub inputs: Vec<ClassDecl>,
    pub query: RootDecl,
    pub mutation: RootDecl,
}

impl SchemaDocument {
    pub fn new(modules: PythonModules) -> Self {
        Self {
            modules,
            enums: Vec::new(),
            objects: Vec::new(),
            inputs: Vec::new(),
            query: RootDecl::new("QueryType"),
            mutation: RootDecl::new("MutationType"),
        }
    }

    fn resolvers(&self) -> impl Iterator<Item = &ResolverDecl> {
        self.query
            .resolvers
            .iter()
            .chain(self.mutation.resolvers.iter())
    }

    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "import {GRAPHENE}")?;

        let mut imports = BTreeSet::new();
        for resolver in self.resolvers() {
            imports.insert(format!("{}.{}", self.modules.proto, resolver.proto_module));
        }
        if self.resolvers().next().is_some() {
            imports.insert(self.modules.handlers.clone());
        }
        for module in imports {
            writeln!(f, "import {module}")?;
        }

        match self.modules.extensions.rsplit_once('.') {
            Some((parent, leaf)) => writeln!(f, "from {parent} import {leaf}")?,
            None => writeln!(f, "import {}", self.modules.extensions)?,
        }
        writeln!(f, "from {} import {LONG_STRING}", self.modules.scalars)?;
        writeln!(f, "from {} import parse_dict", self.modules.parse_dict)?;
        writeln!(f)
    }

    fn write_class(f: &mut fmt::Formatter<'_>, class: &ClassDecl, base: &str) -> fmt::Result {
        write!(f, "\nclass {}({GRAPHENE}.{base}):", class.name)?;
        for field in &class.fields {
            write!(f, "\n{INDENT}{} = {}", field.name, field.ty)?;
        }
        write!(f, "\n\n")
    }

    fn write_root(&self, f: &mut fmt::Formatter<'_>, root: &RootDecl) -> fmt::Result {
        write!(f, "\nclass {}({GRAPHENE}.ObjectType):", root.name)?;
        for op in &root.operations {
            write!(
                f,
                "\n{INDENT}{} = {GRAPHENE}.Field({}, input={}())",
                op.name, op.output, op.input
            )?;
        }
        if root.operations.is_empty() {
            write!(f, "\n{INDENT}{PLACEHOLDER_FIELD} = {}", TypeExpr::Placeholder)?;
        }
        writeln!(f)?;

        for resolver in &root.resolvers {
            write!(f, "\n{INDENT}def {}(self, info, input):", resolver.name)?;
            write!(f, "\n{INDENT2}input_dict = vars(input)")?;
            write!(
                f,
                "\n{INDENT2}request_message = {}.{}.{}()",
                self.modules.proto, resolver.proto_module, resolver.request_class
            )?;
            write!(f, "\n{INDENT2}parse_dict(input_dict, request_message)")?;
            write!(
                f,
                "\n{INDENT2}return {}.{}(request_message)",
                self.modules.handlers, resolver.handler
            )?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for SchemaDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_header(f)?;

        for decl in &self.enums {
            write!(f, "\nclass {}({GRAPHENE}.Enum):", decl.name)?;
            for member in &decl.members {
                write!(f, "\n{INDENT}{member} = '{member}'")?;
            }
            write!(f, "\n\n")?;
        }

        for class in &self.objects {
            Self::write_class(f, class, "ObjectType")?;
        }

        for class in &self.inputs {
            Self::write_class(f, class, "InputObjectType")?;
        }

        self.write_root(f, &self.query)?;
        writeln!(f)?;
        self.write_root(f, &self.mutation)
    }
}
