//! Builds the schema document from a generation state.

use crate::config::PythonModules;
use crate::descriptor::{proto_module, request_class};
use crate::document::{
    ClassDecl, EnumDecl, FieldDecl, OperationDecl, ResolverDecl, RootDecl, SchemaDocument,
};
use crate::error::Result;
use crate::extensions::OverrideMap;
use crate::mapper::TypeMapper;
use crate::naming::{
    camel_to_snake, fully_qualified_pascal_name, handler_name, input_type_name,
    method_qualified_name, resolver_name, snake_to_pascal,
};
use crate::state::GenerationState;
use prost_reflect::{MessageDescriptor, MethodDescriptor};
use tracing::{debug, info};

/// Drives one generation run over a [`GenerationState`].
///
/// Phases always run in the same order: enums, object types, input types,
/// the query root, then the mutation root.
#[derive(Debug, Clone)]
pub struct SchemaSynthesizer<'a> {
    mapper: TypeMapper<'a>,
    modules: PythonModules,
}

impl<'a> SchemaSynthesizer<'a> {
    pub fn new(overrides: &'a OverrideMap, modules: PythonModules) -> Self {
        Self {
            mapper: TypeMapper::new(overrides),
            modules,
        }
    }

    /// Build the declaration tree without rendering it.
    pub fn build(&self, state: &GenerationState) -> Result<SchemaDocument> {
        let mut doc = SchemaDocument::new(self.modules.clone());

        for desc in state.enums() {
            doc.enums.push(EnumDecl {
                name: snake_to_pascal(&fully_qualified_pascal_name(desc.full_name())),
                members: desc.values().map(|v| v.name().to_string()).collect(),
            });
        }

        for message in state.types() {
            doc.objects.push(self.class(message, false)?);
        }

        for message in state.inputs() {
            doc.inputs.push(self.class(message, true)?);
        }

        self.root(&mut doc.query, state.queries());
        self.root(&mut doc.mutation, state.mutations());

        debug!(
            enums = doc.enums.len(),
            objects = doc.objects.len(),
            inputs = doc.inputs.len(),
            queries = doc.query.operations.len(),
            mutations = doc.mutation.operations.len(),
            "Built schema document"
        );
        Ok(doc)
    }

    /// Generate the schema module source.
    pub fn synthesize(&self, state: &GenerationState) -> Result<String> {
        let source = self.build(state)?.to_string();
        info!(bytes = source.len(), "Generated graphene schema");
        Ok(source)
    }

    fn class(&self, message: &MessageDescriptor, is_input: bool) -> Result<ClassDecl> {
        let name = if is_input {
            input_type_name(message.full_name())
        } else {
            fully_qualified_pascal_name(message.full_name())
        };

        let fields = message
            .fields()
            .map(|field| {
                Ok(FieldDecl {
                    name: camel_to_snake(field.name()),
                    ty: self.mapper.map_field(&field, is_input)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ClassDecl::new(name, fields))
    }

    fn root(&self, root: &mut RootDecl, methods: &[MethodDescriptor]) {
        for method in methods {
            let operation = method_qualified_name(method);
            root.operations.push(OperationDecl {
                name: operation.clone(),
                output: fully_qualified_pascal_name(method.output().full_name()),
                input: input_type_name(method.input().full_name()),
            });
            root.resolvers.push(ResolverDecl {
                name: resolver_name(&operation),
                proto_module: proto_module(method),
                request_class: request_class(method),
                handler: handler_name(method.name()),
            });
        }
    }
}

/// One-shot helper: build the document for `state` and render it.
pub fn generate_schema(
    state: &GenerationState,
    overrides: &OverrideMap,
    modules: &PythonModules,
) -> Result<String> {
    SchemaSynthesizer::new(overrides, modules.clone()).synthesize(state)
}
