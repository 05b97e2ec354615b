//! Conversion of type descriptors into TypeScript type expressions.

use tracing::debug;

use crate::{
    graph::{Kind, Shape, TypeId},
    registry::{Registry, TS_STRING, TS_UNKNOWN},
};

/// Maps type descriptors to TypeScript type expressions.
///
/// Pointers and slices are nullability layers on top of a resolved base type:
/// `*T` and `[]T` both become `T | null`, `*[]T` becomes `T[] | null`. Maps are
/// always `{ [key: K]: V } | null` and byte slices are always `string`.
#[derive(Debug, Clone, Copy)]
pub struct Converter<'r, 'g> {
    registry: &'r Registry<'g>,
}

impl<'r, 'g> Converter<'r, 'g> {
    pub fn new(registry: &'r Registry<'g>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry<'g> {
        self.registry
    }

    /// TypeScript expression referring to `id`.
    pub fn convert(&self, id: TypeId) -> String {
        self.convert_inner(id, None)
    }

    /// Right-hand side of the alias declaring `id`.
    ///
    /// Identical to [`Converter::convert`] except that the registered name of
    /// `id` itself is not used, so a named type never aliases itself.
    pub fn convert_definition(&self, id: TypeId) -> String {
        self.convert_inner(id, Some(id))
    }

    fn convert_inner(&self, id: TypeId, skip: Option<TypeId>) -> String {
        let graph = self.registry.graph();
        let mut item = id;

        let was_pointer = match graph.get(item).shape() {
            Shape::Pointer(elem) => {
                item = *elem;
                true
            }
            _ => false,
        };

        let mut was_slice = false;
        if let Shape::Slice(elem) | Shape::Array { elem, .. } = graph.get(item).shape() {
            if graph.kind(*elem) == Kind::Uint8 {
                return TS_STRING.to_string();
            }
            item = *elem;
            was_slice = true;
        }

        if let Shape::Map { key, value } = graph.get(item).shape() {
            return format!(
                "{{ [key: {}]: {} }} | null",
                self.convert(*key),
                self.convert(*value)
            );
        }

        let found = match skip {
            Some(skip) => self.registry.lookup_excluding(item, skip),
            None => self.registry.lookup(item),
        };

        let mut ts = match found {
            Some(name) => name.to_string(),
            None if graph.get(item).renders_to_string() => TS_STRING.to_string(),
            None => {
                debug!(ty = %graph.display(item), "no mapping for type, emitting unknown");
                TS_UNKNOWN.to_string()
            }
        };

        if was_slice {
            ts.push_str("[]");
        }
        if was_slice || was_pointer {
            ts.push_str(" | null");
        }

        ts
    }
}
