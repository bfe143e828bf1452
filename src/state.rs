//! Which descriptors a generation run emits, and in which role

use crate::error::{Error, Result};
use crate::naming::{fully_qualified_pascal_name, input_type_name, method_qualified_name};
use prost_reflect::{EnumDescriptor, Kind, MessageDescriptor, MethodDescriptor};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Emission sets for one generation run.
///
/// Each set keeps insertion order and ignores duplicates, so the generated
/// document follows the order descriptors were added in.
#[derive(Debug, Clone, Default)]
pub struct GenerationState {
    enums: Vec<EnumDescriptor>,
    types: Vec<MessageDescriptor>,
    inputs: Vec<MessageDescriptor>,
    queries: Vec<MethodDescriptor>,
    mutations: Vec<MethodDescriptor>,
}

fn push_unique<T: PartialEq>(set: &mut Vec<T>, item: T) -> bool {
    if set.contains(&item) {
        false
    } else {
        set.push(item);
        true
    }
}

impl GenerationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_enum(&mut self, desc: EnumDescriptor) -> bool {
        push_unique(&mut self.enums, desc)
    }

    pub fn add_type(&mut self, desc: MessageDescriptor) -> bool {
        push_unique(&mut self.types, desc)
    }

    pub fn add_input(&mut self, desc: MessageDescriptor) -> bool {
        push_unique(&mut self.inputs, desc)
    }

    pub fn add_query(&mut self, method: MethodDescriptor) -> bool {
        push_unique(&mut self.queries, method)
    }

    pub fn add_mutation(&mut self, method: MethodDescriptor) -> bool {
        push_unique(&mut self.mutations, method)
    }

    pub fn enums(&self) -> &[EnumDescriptor] {
        &self.enums
    }

    pub fn types(&self) -> &[MessageDescriptor] {
        &self.types
    }

    pub fn inputs(&self) -> &[MessageDescriptor] {
        &self.inputs
    }

    pub fn queries(&self) -> &[MethodDescriptor] {
        &self.queries
    }

    pub fn mutations(&self) -> &[MethodDescriptor] {
        &self.mutations
    }

    /// Build a complete state from classified methods.
    ///
    /// Outputs and every message reachable from them become object types,
    /// inputs and every message reachable from them become input types, and
    /// enums reachable from either side become enums.
    pub fn from_operations<Q, M>(queries: Q, mutations: M) -> Self
    where
        Q: IntoIterator<Item = MethodDescriptor>,
        M: IntoIterator<Item = MethodDescriptor>,
    {
        let mut state = Self::new();
        for method in queries {
            state.add_query(method);
        }
        for method in mutations {
            state.add_mutation(method);
        }

        let methods: Vec<MethodDescriptor> = state
            .queries
            .iter()
            .chain(state.mutations.iter())
            .cloned()
            .collect();
        for method in &methods {
            state.add_closure(method.output(), false);
            state.add_closure(method.input(), true);
        }

        debug!(
            enums = state.enums.len(),
            types = state.types.len(),
            inputs = state.inputs.len(),
            queries = state.queries.len(),
            mutations = state.mutations.len(),
            "Computed generation state"
        );
        state
    }

    /// Breadth-first walk in field declaration order.
    fn add_closure(&mut self, root: MessageDescriptor, is_input: bool) {
        let mut queue = VecDeque::from([root]);
        while let Some(message) = queue.pop_front() {
            let added = if is_input {
                self.add_input(message.clone())
            } else {
                self.add_type(message.clone())
            };
            if !added {
                continue;
            }
            for field in message.fields() {
                match field.kind() {
                    Kind::Message(nested) => queue.push_back(nested),
                    Kind::Enum(enum_desc) => {
                        self.add_enum(enum_desc);
                    }
                    _ => {}
                }
            }
        }
    }

    /// Check that every emitted reference points at an emitted type and
    /// that operation names are unique.
    pub fn validate(&self) -> Result<()> {
        let enums: HashSet<&str> = self.enums.iter().map(|e| e.full_name()).collect();
        let types: HashSet<&str> = self.types.iter().map(|m| m.full_name()).collect();
        let inputs: HashSet<&str> = self.inputs.iter().map(|m| m.full_name()).collect();

        let check_fields = |message: &MessageDescriptor, is_input: bool| -> Result<()> {
            let owner = if is_input {
                input_type_name(message.full_name())
            } else {
                fully_qualified_pascal_name(message.full_name())
            };
            for field in message.fields() {
                match field.kind() {
                    Kind::Enum(enum_desc) if !enums.contains(enum_desc.full_name()) => {
                        return Err(Error::IncompleteState {
                            referenced: fully_qualified_pascal_name(enum_desc.full_name()),
                            by: owner,
                            category: "enum",
                        });
                    }
                    Kind::Message(nested) if is_input && !inputs.contains(nested.full_name()) => {
                        return Err(Error::IncompleteState {
                            referenced: input_type_name(nested.full_name()),
                            by: owner,
                            category: "input",
                        });
                    }
                    Kind::Message(nested) if !is_input && !types.contains(nested.full_name()) => {
                        return Err(Error::IncompleteState {
                            referenced: fully_qualified_pascal_name(nested.full_name()),
                            by: owner,
                            category: "type",
                        });
                    }
                    _ => {}
                }
            }
            Ok(())
        };

        for message in &self.types {
            check_fields(message, false)?;
        }
        for message in &self.inputs {
            check_fields(message, true)?;
        }

        let mut operations = HashSet::new();
        for method in self.queries.iter().chain(self.mutations.iter()) {
            let operation = method_qualified_name(method);
            let output = method.output();
            if !types.contains(output.full_name()) {
                return Err(Error::IncompleteState {
                    referenced: fully_qualified_pascal_name(output.full_name()),
                    by: operation,
                    category: "type",
                });
            }
            let input = method.input();
            if !inputs.contains(input.full_name()) {
                return Err(Error::IncompleteState {
                    referenced: input_type_name(input.full_name()),
                    by: operation,
                    category: "input",
                });
            }
            if !operations.insert(operation.clone()) {
                return Err(Error::DuplicateOperation(operation));
            }
        }

        Ok(())
    }
}
