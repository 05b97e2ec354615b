//! Type descriptors for Rust types.
//!
//! Implementations mirror how serde_json serializes the type: sequences become
//! slices, `Option<T>` becomes a pointer, maps stay maps.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::graph::{Kind, TypeGraph, TypeId};

/// A Rust type that can describe its serialized shape.
///
/// Named structs implement this through [`TypeGraph::describe_named`] so that
/// recursive references resolve to the same descriptor:
///
/// ```
/// use tsmirror_core::{Describe, Shape, StructField, TypeGraph, TypeId};
///
/// struct Node {
///     children: Vec<Node>,
/// }
///
/// impl Describe for Node {
///     fn describe(graph: &mut TypeGraph) -> TypeId {
///         graph.describe_named::<Self>("Node", |graph| {
///             let children = graph.describe::<Vec<Node>>();
///             Shape::Struct(vec![StructField::new("children", children)])
///         })
///     }
/// }
///
/// let mut graph = TypeGraph::new();
/// let node = graph.describe::<Node>();
/// assert_eq!(graph.display(node), "Node");
/// ```
pub trait Describe {
    fn describe(graph: &mut TypeGraph) -> TypeId;
}

macro_rules! describe_scalar {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe(graph: &mut TypeGraph) -> TypeId {
                    graph.scalar($kind)
                }
            }
        )*
    };
}

describe_scalar! {
    bool => Kind::Bool,
    i8 => Kind::Int8,
    i16 => Kind::Int16,
    i32 => Kind::Int32,
    i64 => Kind::Int64,
    isize => Kind::Int,
    u8 => Kind::Uint8,
    u16 => Kind::Uint16,
    u32 => Kind::Uint32,
    u64 => Kind::Uint64,
    usize => Kind::Uint,
    f32 => Kind::Float32,
    f64 => Kind::Float64,
    char => Kind::String,
    String => Kind::String,
    str => Kind::String,
}

impl<T: Describe + ?Sized> Describe for &T {
    fn describe(graph: &mut TypeGraph) -> TypeId {
        T::describe(graph)
    }
}

impl<T: Describe + ?Sized> Describe for Box<T> {
    fn describe(graph: &mut TypeGraph) -> TypeId {
        T::describe(graph)
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe(graph: &mut TypeGraph) -> TypeId {
        let elem = T::describe(graph);
        graph.pointer(elem)
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe(graph: &mut TypeGraph) -> TypeId {
        let elem = T::describe(graph);
        graph.slice(elem)
    }
}

impl<T: Describe> Describe for [T] {
    fn describe(graph: &mut TypeGraph) -> TypeId {
        let elem = T::describe(graph);
        graph.slice(elem)
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe(graph: &mut TypeGraph) -> TypeId {
        let elem = T::describe(graph);
        graph.array(elem, N)
    }
}

impl<T: Describe, S> Describe for HashSet<T, S> {
    fn describe(graph: &mut TypeGraph) -> TypeId {
        let elem = T::describe(graph);
        graph.slice(elem)
    }
}

impl<T: Describe> Describe for BTreeSet<T> {
    fn describe(graph: &mut TypeGraph) -> TypeId {
        let elem = T::describe(graph);
        graph.slice(elem)
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn describe(graph: &mut TypeGraph) -> TypeId {
        let key = K::describe(graph);
        let value = V::describe(graph);
        graph.map(key, value)
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn describe(graph: &mut TypeGraph) -> TypeId {
        let key = K::describe(graph);
        let value = V::describe(graph);
        graph.map(key, value)
    }
}

impl Describe for serde_json::Value {
    fn describe(graph: &mut TypeGraph) -> TypeId {
        graph.any()
    }
}
