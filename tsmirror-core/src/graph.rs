//! Interned type descriptors.
//!
//! A [`TypeGraph`] is an arena of [`TypeDef`]s addressed by [`TypeId`] tokens.
//! Unnamed composite types are interned structurally, so building
//! `map[string]Group` twice yields the same id. Named types are unique per
//! declaration and may be declared before they are defined, which is how
//! self-referential and mutually-referential graphs stay finite.

use std::collections::{BTreeSet, HashMap};

use crate::{CoreError, Result, tag::StructTag};

/// Identity token of a type inside a [`TypeGraph`].
///
/// Two ids are equal exactly when they refer to the same underlying type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    /// Position of the type in its graph.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Coarse classification of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    Pointer,
    Slice,
    Array,
    Map,
    Struct,
    Interface,
}

impl Kind {
    /// Every kind that maps onto a JavaScript number.
    pub const NUMERIC: [Kind; 15] = [
        Kind::Int,
        Kind::Int8,
        Kind::Int16,
        Kind::Int32,
        Kind::Int64,
        Kind::Uint,
        Kind::Uint8,
        Kind::Uint16,
        Kind::Uint32,
        Kind::Uint64,
        Kind::Uintptr,
        Kind::Float32,
        Kind::Float64,
        Kind::Complex64,
        Kind::Complex128,
    ];

    pub fn is_numeric(self) -> bool {
        Self::NUMERIC.contains(&self)
    }

    /// Kinds that carry no element types.
    pub fn is_scalar(self) -> bool {
        self.is_numeric() || matches!(self, Kind::Bool | Kind::String)
    }

    /// The source-language spelling of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Int8 => "int8",
            Kind::Int16 => "int16",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Uint => "uint",
            Kind::Uint8 => "uint8",
            Kind::Uint16 => "uint16",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Uintptr => "uintptr",
            Kind::Float32 => "float32",
            Kind::Float64 => "float64",
            Kind::Complex64 => "complex64",
            Kind::Complex128 => "complex128",
            Kind::String => "string",
            Kind::Pointer => "ptr",
            Kind::Slice => "slice",
            Kind::Array => "array",
            Kind::Map => "map",
            Kind::Struct => "struct",
            Kind::Interface => "interface",
        }
    }
}

/// Structural shape of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Bool, numeric or string kind.
    Scalar(Kind),
    Pointer(TypeId),
    Slice(TypeId),
    Array { elem: TypeId, len: usize },
    Map { key: TypeId, value: TypeId },
    /// Members in declaration order.
    Struct(Vec<StructField>),
    /// Method set; empty for `any`.
    Interface(Vec<String>),
}

impl Shape {
    pub fn kind(&self) -> Kind {
        match self {
            Shape::Scalar(kind) => *kind,
            Shape::Pointer(_) => Kind::Pointer,
            Shape::Slice(_) => Kind::Slice,
            Shape::Array { .. } => Kind::Array,
            Shape::Map { .. } => Kind::Map,
            Shape::Struct(_) => Kind::Struct,
            Shape::Interface(_) => Kind::Interface,
        }
    }

    /// Element type of pointers, slices and arrays.
    pub fn elem(&self) -> Option<TypeId> {
        match self {
            Shape::Pointer(elem) | Shape::Slice(elem) | Shape::Array { elem, .. } => Some(*elem),
            _ => None,
        }
    }
}

/// A member of a struct type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructField {
    pub name: String,
    pub ty: TypeId,
    pub tag: StructTag,
    /// Anonymous member whose fields are promoted into the parent.
    pub embedded: bool,
    /// Visible outside the declaring scope.
    pub exported: bool,
}

impl StructField {
    /// An exported, untagged member.
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            tag: StructTag::default(),
            embedded: false,
            exported: true,
        }
    }

    /// A member that is not visible outside its declaring scope.
    pub fn private(name: impl Into<String>, ty: TypeId) -> Self {
        Self::new(name, ty).exported(false)
    }

    /// An embedded member named after its type.
    pub fn embedded(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            embedded: true,
            ..Self::new(name, ty)
        }
    }

    pub fn tag(mut self, tag: impl Into<StructTag>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Shorthand for a `json:"..."` struct tag.
    pub fn json(self, value: &str) -> Self {
        self.tag(StructTag::json(value))
    }

    pub fn exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }
}

/// One entry of the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDef {
    name: Option<String>,
    shape: Shape,
    renders_to_string: bool,
}

impl TypeDef {
    /// Declared name, `None` for type literals.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn kind(&self) -> Kind {
        self.shape.kind()
    }

    /// Whether the type satisfies the "renders to string" capability.
    pub fn renders_to_string(&self) -> bool {
        self.renders_to_string
    }
}

/// Arena of type descriptors.
#[derive(Debug, Clone)]
pub struct TypeGraph {
    types: Vec<TypeDef>,
    interned: HashMap<TypeDef, TypeId>,
    pending: BTreeSet<TypeId>,
    described: HashMap<std::any::TypeId, TypeId>,
    any: TypeId,
    timestamp: TypeId,
    duration: TypeId,
}

impl Default for TypeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeGraph {
    /// Create a graph holding the well-known `any`, `Timestamp` and `Duration` types.
    pub fn new() -> Self {
        let mut graph = Self {
            types: Vec::new(),
            interned: HashMap::new(),
            pending: BTreeSet::new(),
            described: HashMap::new(),
            any: TypeId(0),
            timestamp: TypeId(0),
            duration: TypeId(0),
        };

        graph.any = graph.intern(Shape::Interface(Vec::new()));
        graph.timestamp = graph.push(TypeDef {
            name: Some("Timestamp".to_string()),
            shape: Shape::Struct(Vec::new()),
            renders_to_string: true,
        });
        graph.duration = graph.push(TypeDef {
            name: Some("Duration".to_string()),
            shape: Shape::Scalar(Kind::Int64),
            renders_to_string: true,
        });

        graph
    }

    /// The empty interface.
    pub fn any(&self) -> TypeId {
        self.any
    }

    /// Absolute point in time, serialized as a string.
    pub fn timestamp(&self) -> TypeId {
        self.timestamp
    }

    /// Elapsed time, serialized as a number.
    pub fn duration(&self) -> TypeId {
        self.duration
    }

    pub fn get(&self, id: TypeId) -> &TypeDef {
        &self.types[id.index()]
    }

    pub fn kind(&self, id: TypeId) -> Kind {
        self.get(id).kind()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over every type in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeDef)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, def)| (TypeId(i as u32), def))
    }

    /// Find a named type by its declared name.
    pub fn find(&self, name: &str) -> Option<TypeId> {
        self.iter()
            .find(|(_, def)| def.name() == Some(name))
            .map(|(id, _)| id)
    }

    pub fn scalar(&mut self, kind: Kind) -> TypeId {
        debug_assert!(kind.is_scalar(), "{} is not a scalar kind", kind.as_str());
        self.intern(Shape::Scalar(kind))
    }

    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        self.intern(Shape::Pointer(elem))
    }

    pub fn slice(&mut self, elem: TypeId) -> TypeId {
        self.intern(Shape::Slice(elem))
    }

    pub fn array(&mut self, elem: TypeId, len: usize) -> TypeId {
        self.intern(Shape::Array { elem, len })
    }

    pub fn map(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(Shape::Map { key, value })
    }

    /// An anonymous struct literal.
    pub fn structure(&mut self, fields: Vec<StructField>) -> TypeId {
        self.intern(Shape::Struct(fields))
    }

    /// An interface literal with the given method set.
    pub fn interface(&mut self, methods: Vec<String>) -> TypeId {
        self.intern(Shape::Interface(methods))
    }

    /// Reserve a named type whose shape is supplied later with [`TypeGraph::define`].
    pub fn declare(&mut self, name: impl Into<String>) -> TypeId {
        let id = self.push(TypeDef {
            name: Some(name.into()),
            shape: Shape::Struct(Vec::new()),
            renders_to_string: false,
        });
        self.pending.insert(id);
        id
    }

    /// Supply the shape of a declared type.
    pub fn define(&mut self, id: TypeId, shape: Shape) -> Result<()> {
        if !self.pending.remove(&id) {
            return Err(CoreError::AlreadyDefined {
                name: self.display(id),
            });
        }
        self.types[id.index()].shape = shape;
        Ok(())
    }

    /// Declare and define a named type in one step.
    pub fn named(&mut self, name: impl Into<String>, shape: Shape) -> TypeId {
        self.push(TypeDef {
            name: Some(name.into()),
            shape,
            renders_to_string: false,
        })
    }

    /// Mark a named type as rendering to a string.
    pub fn set_renders_to_string(&mut self, id: TypeId, value: bool) -> Result<()> {
        if self.get(id).name().is_none() {
            return Err(CoreError::NotNamed {
                ty: self.display(id),
            });
        }
        self.types[id.index()].renders_to_string = value;
        Ok(())
    }

    /// Check that every declared type has been defined.
    pub fn validate(&self) -> Result<()> {
        match self.pending.first() {
            Some(id) => Err(CoreError::UndefinedType {
                name: self.display(*id),
            }),
            None => Ok(()),
        }
    }

    /// Descriptor for a Rust type.
    pub fn describe<T: crate::Describe + ?Sized>(&mut self) -> TypeId {
        T::describe(self)
    }

    /// Describe a named Rust type, reserving its id before its shape is built
    /// so recursive types refer back to it.
    pub fn describe_named<T: ?Sized + 'static>(
        &mut self,
        name: &str,
        build: impl FnOnce(&mut Self) -> Shape,
    ) -> TypeId {
        let key = std::any::TypeId::of::<T>();
        if let Some(id) = self.described.get(&key) {
            return *id;
        }

        let id = self.declare(name);
        self.described.insert(key, id);
        let shape = build(self);
        self.pending.remove(&id);
        self.types[id.index()].shape = shape;
        id
    }

    /// Source-language spelling of a type, e.g. `map[string][]*Group`.
    pub fn display(&self, id: TypeId) -> String {
        let def = self.get(id);
        if let Some(name) = def.name() {
            return name.to_string();
        }

        match def.shape() {
            Shape::Scalar(kind) => kind.as_str().to_string(),
            Shape::Pointer(elem) => format!("*{}", self.display(*elem)),
            Shape::Slice(elem) => format!("[]{}", self.display(*elem)),
            Shape::Array { elem, len } => format!("[{}]{}", len, self.display(*elem)),
            Shape::Map { key, value } => {
                format!("map[{}]{}", self.display(*key), self.display(*value))
            }
            Shape::Struct(fields) if fields.is_empty() => "struct{}".to_string(),
            Shape::Struct(fields) => {
                let members: Vec<String> = fields
                    .iter()
                    .map(|f| format!("{} {}", f.name, self.display(f.ty)))
                    .collect();
                format!("struct{{ {} }}", members.join("; "))
            }
            Shape::Interface(methods) if methods.is_empty() => "any".to_string(),
            Shape::Interface(methods) => format!("interface{{ {} }}", methods.join("; ")),
        }
    }

    fn intern(&mut self, shape: Shape) -> TypeId {
        let def = TypeDef {
            name: None,
            shape,
            renders_to_string: false,
        };
        if let Some(id) = self.interned.get(&def) {
            return *id;
        }
        let id = self.push(def.clone());
        self.interned.insert(def, id);
        id
    }

    fn push(&mut self, def: TypeDef) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(def);
        id
    }
}
