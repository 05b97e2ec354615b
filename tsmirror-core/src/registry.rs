//! Mapping from source types to TypeScript type names.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::{
    CoreError, GenerationInput, Result,
    graph::{Kind, TypeGraph, TypeId},
};

pub const TS_STRING: &str = "string";
pub const TS_NUMBER: &str = "number";
pub const TS_BOOLEAN: &str = "boolean";
pub const TS_ANY: &str = "any";
pub const TS_UNKNOWN: &str = "unknown";

/// Resolves type identities and kinds to TypeScript type names.
///
/// Lookup order for a type is: registered name, type override, kind default.
/// A registry is built once per generation run and only read afterwards.
#[derive(Debug, Clone)]
pub struct Registry<'g> {
    graph: &'g TypeGraph,
    named: HashMap<TypeId, String>,
    names: BTreeMap<String, TypeId>,
    types: HashMap<TypeId, String>,
    kinds: HashMap<Kind, String>,
}

impl<'g> Registry<'g> {
    /// Create a registry seeded with the baseline mappings.
    pub fn new(graph: &'g TypeGraph) -> Self {
        let mut kinds: HashMap<Kind, String> = Kind::NUMERIC
            .iter()
            .map(|kind| (*kind, TS_NUMBER.to_string()))
            .collect();
        kinds.insert(Kind::Bool, TS_BOOLEAN.to_string());
        kinds.insert(Kind::String, TS_STRING.to_string());

        let types = HashMap::from([
            (graph.any(), TS_ANY.to_string()),
            (graph.timestamp(), TS_STRING.to_string()),
            (graph.duration(), TS_NUMBER.to_string()),
        ]);

        Self {
            graph,
            named: HashMap::new(),
            names: BTreeMap::new(),
            types,
            kinds,
        }
    }

    /// Build the registry for one run: baseline, caller overrides, then every
    /// exposed type in name order.
    pub fn for_input(graph: &'g TypeGraph, input: &GenerationInput) -> Result<Self> {
        let mut registry = Self::new(graph);

        for (kind, ts) in &input.kind_overrides {
            registry.override_kind(*kind, ts.clone());
        }
        for (id, ts) in &input.type_overrides {
            registry.override_type(*id, ts.clone());
        }
        for (name, id) in &input.types {
            registry.register(name.clone(), *id)?;
        }

        Ok(registry)
    }

    pub fn graph(&self) -> &'g TypeGraph {
        self.graph
    }

    /// Expose `id` under `name`; later encounters of the type resolve to the name.
    pub fn register(&mut self, name: impl Into<String>, id: TypeId) -> Result<()> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(CoreError::DuplicateName { name });
        }

        match self.named.get(&id) {
            Some(existing) => warn!(
                ty = %self.graph.display(id),
                kept = %existing,
                ignored = %name,
                "type registered under several names, references use the first"
            ),
            None => {
                debug!(ty = %self.graph.display(id), name = %name, "registered type");
                self.named.insert(id, name.clone());
            }
        }

        self.names.insert(name, id);
        Ok(())
    }

    /// Map a specific type to a TypeScript type.
    pub fn override_type(&mut self, id: TypeId, ts: impl Into<String>) {
        self.types.insert(id, ts.into());
    }

    /// Map every type of a kind to a TypeScript type.
    pub fn override_kind(&mut self, kind: Kind, ts: impl Into<String>) {
        self.kinds.insert(kind, ts.into());
    }

    pub fn lookup(&self, id: TypeId) -> Option<&str> {
        self.named
            .get(&id)
            .or_else(|| self.types.get(&id))
            .map(String::as_str)
            .or_else(|| self.lookup_kind(self.graph.kind(id)))
    }

    /// Like [`Registry::lookup`], ignoring the registered name of `skip`.
    pub fn lookup_excluding(&self, id: TypeId, skip: TypeId) -> Option<&str> {
        if id != skip {
            return self.lookup(id);
        }
        self.types
            .get(&id)
            .map(String::as_str)
            .or_else(|| self.lookup_kind(self.graph.kind(id)))
    }

    pub fn lookup_kind(&self, kind: Kind) -> Option<&str> {
        self.kinds.get(&kind).map(String::as_str)
    }

    pub fn has_type_override(&self, id: TypeId) -> bool {
        self.types.contains_key(&id)
    }
}
