//! Enumeration of the serialized fields of a struct type.

use crate::{
    convert::Converter,
    graph::{Shape, TypeId},
    tag::{FieldTag, PropertyName},
};

/// Struct tag key holding the serialization annotation.
pub const JSON_TAG: &str = "json";

/// A serialized member of a struct type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMetadata {
    /// Member name as declared.
    pub name: String,
    /// Property name in the generated type (rename applied, quoted if needed).
    pub display: PropertyName,
    pub tag: FieldTag,
    pub optional: bool,
    pub ty: TypeId,
    /// Converted TypeScript type of the member.
    pub ts_type: String,
}

/// Walks struct members in declaration order, promoting embedded members.
#[derive(Debug, Clone, Copy)]
pub struct FieldEnumerator<'r, 'g> {
    converter: Converter<'r, 'g>,
}

impl<'r, 'g> FieldEnumerator<'r, 'g> {
    pub fn new(converter: Converter<'r, 'g>) -> Self {
        Self { converter }
    }

    /// Call `visit` for every serialized field of `id`.
    ///
    /// A leading pointer is unwrapped. Non-struct types have no fields.
    pub fn enumerate(&self, id: TypeId, mut visit: impl FnMut(FieldMetadata)) {
        let mut in_progress = Vec::new();
        self.walk(id, &mut in_progress, &mut visit);
    }

    /// Collect every serialized field of `id`.
    pub fn collect(&self, id: TypeId) -> Vec<FieldMetadata> {
        let mut fields = Vec::new();
        self.enumerate(id, |field| fields.push(field));
        fields
    }

    fn walk<F>(&self, id: TypeId, in_progress: &mut Vec<TypeId>, visit: &mut F)
    where
        F: FnMut(FieldMetadata),
    {
        let graph = self.converter.registry().graph();
        let id = deref(graph.get(id).shape()).unwrap_or(id);

        let Shape::Struct(members) = graph.get(id).shape() else {
            return;
        };
        // A struct reached again through embedded pointers contributes nothing new.
        if in_progress.contains(&id) {
            return;
        }
        in_progress.push(id);

        for member in members {
            if !member.exported {
                continue;
            }

            if member.embedded {
                let target = deref(graph.get(member.ty).shape()).unwrap_or(member.ty);
                if matches!(graph.get(target).shape(), Shape::Struct(_)) {
                    self.walk(target, in_progress, visit);
                    continue;
                }
            }

            let tag = member
                .tag
                .get(JSON_TAG)
                .map(|raw| FieldTag::parse(&raw))
                .unwrap_or_default();
            if tag.ignored {
                continue;
            }

            let display = PropertyName::new(tag.rename.as_deref().unwrap_or(&member.name));
            visit(FieldMetadata {
                name: member.name.clone(),
                display,
                optional: tag.omit_empty,
                tag,
                ty: member.ty,
                ts_type: self.converter.convert(member.ty),
            });
        }

        in_progress.pop();
    }
}

fn deref(shape: &Shape) -> Option<TypeId> {
    match shape {
        Shape::Pointer(elem) => Some(*elem),
        _ => None,
    }
}
