//! Emission-ready items built from the generation input.
//!
//! Every type string carried by an item is already converted, so emitters only
//! format text.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    Result,
    convert::Converter,
    fields::{FieldEnumerator, FieldMetadata},
    graph::{Kind, Shape, TypeGraph, TypeId},
    registry::Registry,
};

/// Namespace used when the caller does not pick one.
pub const DEFAULT_NAMESPACE: &str = "GoGenerated";

/// An HTTP endpoint to expose as a typed fetch stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub method: String,
    pub query: BTreeMap<String, TypeId>,
    pub request_body: Option<TypeId>,
    pub response_body: TypeId,
}

impl Route {
    pub fn new(method: impl Into<String>, path: impl Into<String>, response_body: TypeId) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            query: BTreeMap::new(),
            request_body: None,
            response_body,
        }
    }

    /// Add a query parameter.
    pub fn query(mut self, name: impl Into<String>, ty: TypeId) -> Self {
        self.query.insert(name.into(), ty);
        self
    }

    pub fn request_body(mut self, ty: TypeId) -> Self {
        self.request_body = Some(ty);
        self
    }
}

/// A value to export as a typed constant.
#[derive(Debug, Clone, PartialEq)]
pub struct DataEntry {
    pub value: serde_json::Value,
    pub ty: TypeId,
}

impl DataEntry {
    pub fn new(value: serde_json::Value, ty: TypeId) -> Self {
        Self { value, ty }
    }
}

/// Everything one generation run exposes. Maps are keyed by exposed name.
#[derive(Debug, Clone, Default)]
pub struct GenerationInput {
    pub namespace: Option<String>,
    pub types: BTreeMap<String, TypeId>,
    pub routes: BTreeMap<String, Route>,
    pub data: BTreeMap<String, DataEntry>,
    pub type_overrides: BTreeMap<TypeId, String>,
    pub kind_overrides: BTreeMap<Kind, String>,
}

impl GenerationInput {
    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.routes.is_empty() && self.data.is_empty()
    }
}

/// A top-level type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefinition {
    /// `type Name = <ty>`
    Alias { name: String, ty: String },
    /// `type Name = { ...fields }`
    Object {
        name: String,
        fields: Vec<FieldMetadata>,
    },
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            Self::Alias { name, .. } | Self::Object { name, .. } => name,
        }
    }
}

/// A query parameter of a route stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParam {
    pub name: String,
    pub ts_type: String,
}

/// A fetch stub for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
    pub name: String,
    pub path: String,
    pub method: String,
    /// Sorted by name.
    pub params: Vec<RouteParam>,
    pub request_body: Option<String>,
    pub response: String,
}

/// A typed constant.
#[derive(Debug, Clone, PartialEq)]
pub struct DataLiteral {
    pub name: String,
    pub ts_type: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EmissionItem {
    Type(TypeDefinition),
    Route(RouteDefinition),
    Data(DataLiteral),
}

impl EmissionItem {
    pub fn name(&self) -> &str {
        match self {
            Self::Type(def) => def.name(),
            Self::Route(route) => &route.name,
            Self::Data(data) => &data.name,
        }
    }
}

/// Builds emission items against a frozen registry.
#[derive(Debug, Clone, Copy)]
pub struct ItemBuilder<'r, 'g> {
    converter: Converter<'r, 'g>,
}

impl<'r, 'g> ItemBuilder<'r, 'g> {
    pub fn new(registry: &'r Registry<'g>) -> Self {
        Self {
            converter: Converter::new(registry),
        }
    }

    /// Declaration for the type exposed as `name`.
    ///
    /// Structs (and pointers to structs) without a type or kind override become
    /// object types. Everything else becomes an alias of its converted
    /// definition.
    pub fn type_item(&self, name: &str, id: TypeId) -> TypeDefinition {
        let registry = self.converter.registry();
        let graph = registry.graph();
        let target = match graph.get(id).shape() {
            Shape::Pointer(elem) => *elem,
            _ => id,
        };

        let is_object = graph.kind(target) == Kind::Struct
            && !registry.has_type_override(id)
            && !registry.has_type_override(target)
            && registry.lookup_kind(Kind::Struct).is_none();

        if is_object {
            TypeDefinition::Object {
                name: name.to_string(),
                fields: FieldEnumerator::new(self.converter).collect(id),
            }
        } else {
            TypeDefinition::Alias {
                name: name.to_string(),
                ty: self.converter.convert_definition(id),
            }
        }
    }

    pub fn route_item(&self, name: &str, route: &Route) -> RouteDefinition {
        RouteDefinition {
            name: name.to_string(),
            path: route.path.clone(),
            method: route.method.clone(),
            params: route
                .query
                .iter()
                .map(|(param, ty)| RouteParam {
                    name: param.clone(),
                    ts_type: self.converter.convert(*ty),
                })
                .collect(),
            request_body: route.request_body.map(|ty| self.converter.convert(ty)),
            response: self.converter.convert(route.response_body),
        }
    }

    pub fn data_item(&self, name: &str, entry: &DataEntry) -> DataLiteral {
        DataLiteral {
            name: name.to_string(),
            ts_type: self.converter.convert(entry.ty),
            value: entry.value.clone(),
        }
    }

    /// Types, then routes, then data; each group sorted by name.
    pub fn build(&self, input: &GenerationInput) -> Vec<EmissionItem> {
        let types = input
            .types
            .iter()
            .map(|(name, id)| EmissionItem::Type(self.type_item(name, *id)));
        let routes = input
            .routes
            .iter()
            .map(|(name, route)| EmissionItem::Route(self.route_item(name, route)));
        let data = input
            .data
            .iter()
            .map(|(name, entry)| EmissionItem::Data(self.data_item(name, entry)));

        let items: Vec<EmissionItem> = types.chain(routes).chain(data).collect();
        debug!(
            types = input.types.len(),
            routes = input.routes.len(),
            data = input.data.len(),
            "built emission items"
        );
        items
    }
}

/// Validate the graph, build the registry for `input` and produce its items.
pub fn build_items(graph: &TypeGraph, input: &GenerationInput) -> Result<Vec<EmissionItem>> {
    graph.validate()?;
    let registry = Registry::for_input(graph, input)?;
    Ok(ItemBuilder::new(&registry).build(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::StructField;

    #[test]
    fn test_struct_becomes_object() {
        let mut graph = TypeGraph::new();
        let string = graph.scalar(Kind::String);
        let user = graph.named(
            "TestUser",
            Shape::Struct(vec![StructField::new("Username", string)]),
        );

        let mut input = GenerationInput::default();
        input.types.insert("TestUser".into(), user);
        let items = build_items(&graph, &input).unwrap();

        let [EmissionItem::Type(TypeDefinition::Object { name, fields })] = items.as_slice() else {
            panic!("expected a single object type, got {:?}", items);
        };
        assert_eq!(name, "TestUser");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].display.to_string(), "Username");
        assert_eq!(fields[0].ts_type, "string");
        assert!(!fields[0].optional);
    }

    #[test]
    fn test_aliases() {
        let mut graph = TypeGraph::new();
        let string = graph.scalar(Kind::String);
        let byte = graph.scalar(Kind::Uint8);
        let user_id = graph.named("UserID", Shape::Scalar(Kind::Uint64));
        let group = graph.named("Group", Shape::Struct(Vec::new()));
        let group_map = graph.named(
            "GroupMap",
            Shape::Map {
                key: string,
                value: group,
            },
        );
        let blob = graph.named("Blob", Shape::Slice(byte));

        let mut input = GenerationInput::default();
        input.types.insert("TestUserID".into(), user_id);
        input.types.insert("group".into(), group);
        input.types.insert("GroupMapA".into(), group_map);
        input.types.insert("Blob".into(), blob);
        input.types.insert("Anything".into(), graph.any());

        let registry = Registry::for_input(&graph, &input).unwrap();
        let builder = ItemBuilder::new(&registry);

        let alias = |name: &str, ty: &str| TypeDefinition::Alias {
            name: name.into(),
            ty: ty.into(),
        };
        assert_eq!(
            builder.type_item("TestUserID", user_id),
            alias("TestUserID", "number")
        );
        assert_eq!(
            builder.type_item("GroupMapA", group_map),
            alias("GroupMapA", "{ [key: string]: group } | null")
        );
        assert_eq!(builder.type_item("Blob", blob), alias("Blob", "string"));
        assert_eq!(
            builder.type_item("Anything", graph.any()),
            alias("Anything", "any")
        );
        assert_eq!(
            builder.type_item("Time", graph.timestamp()),
            alias("Time", "string")
        );
    }

    #[test]
    fn test_struct_kind_override_makes_alias() {
        let mut graph = TypeGraph::new();
        let string = graph.scalar(Kind::String);
        let user = graph.named(
            "User",
            Shape::Struct(vec![StructField::new("Name", string)]),
        );
        let user_ptr = graph.pointer(user);

        let mut input = GenerationInput::default();
        input.types.insert("User".into(), user);
        input
            .kind_overrides
            .insert(Kind::Struct, "Record<string, unknown>".into());

        let items = build_items(&graph, &input).unwrap();
        assert_eq!(
            items,
            vec![EmissionItem::Type(TypeDefinition::Alias {
                name: "User".into(),
                ty: "Record<string, unknown>".into(),
            })]
        );

        let registry = Registry::for_input(&graph, &input).unwrap();
        let builder = ItemBuilder::new(&registry);
        assert_eq!(
            builder.type_item("UserRef", user_ptr),
            TypeDefinition::Alias {
                name: "UserRef".into(),
                ty: "User | null".into(),
            }
        );
    }

    #[test]
    fn test_self_referential_type_uses_its_name() {
        let mut graph = TypeGraph::new();
        let string = graph.scalar(Kind::String);
        let node = graph.declare("Node");
        let children = graph.slice(node);
        let parent = graph.pointer(node);
        let index = graph.map(string, node);
        graph
            .define(
                node,
                Shape::Struct(vec![
                    StructField::new("Name", string),
                    StructField::new("Children", children),
                    StructField::new("Parent", parent),
                    StructField::new("Index", index),
                ]),
            )
            .unwrap();

        let mut input = GenerationInput::default();
        input.types.insert("Group".into(), node);
        let items = build_items(&graph, &input).unwrap();

        let [EmissionItem::Type(TypeDefinition::Object { name, fields })] = items.as_slice() else {
            panic!("expected a single object type, got {:?}", items);
        };
        assert_eq!(name, "Group");
        let rendered: Vec<_> = fields
            .iter()
            .map(|field| format!("{}: {}", field.display, field.ts_type))
            .collect();
        assert_eq!(
            rendered,
            vec![
                "Name: string",
                "Children: Group[] | null",
                "Parent: Group | null",
                "Index: { [key: string]: Group } | null",
            ]
        );
    }

    #[test]
    fn test_route_item() {
        let mut graph = TypeGraph::new();
        let string = graph.scalar(Kind::String);
        let user_id = graph.named("UserID", Shape::Scalar(Kind::Uint64));
        let user = graph.named(
            "User",
            Shape::Struct(vec![StructField::new("Name", string)]),
        );
        let users = graph.slice(user);

        let mut input = GenerationInput::default();
        input.types.insert("SystemUser".into(), user);
        input.types.insert("TestUserID".into(), user_id);
        input.routes.insert(
            "userGet".into(),
            Route::new("GET", "/api/user", users)
                .query("userID", user_id)
                .query("expand", string),
        );
        input.routes.insert(
            "ping".into(),
            Route::new("GET", "/api/ping", string),
        );

        let registry = Registry::for_input(&graph, &input).unwrap();
        let builder = ItemBuilder::new(&registry);

        let get = builder.route_item("userGet", &input.routes["userGet"]);
        assert_eq!(get.response, "SystemUser[] | null");
        assert_eq!(get.request_body, None);
        let params: Vec<_> = get
            .params
            .iter()
            .map(|p| (p.name.as_str(), p.ts_type.as_str()))
            .collect();
        assert_eq!(params, vec![("expand", "string"), ("userID", "TestUserID")]);

        let ping = builder.route_item("ping", &input.routes["ping"]);
        assert_eq!(ping.response, Converter::new(&registry).convert(string));
        assert!(ping.params.is_empty());
    }

    #[test]
    fn test_ordering() {
        let mut graph = TypeGraph::new();
        let string = graph.scalar(Kind::String);
        let bravo = graph.named("Bravo", Shape::Struct(Vec::new()));
        let alpha = graph.named("Alpha", Shape::Struct(Vec::new()));

        let mut input = GenerationInput::default();
        input.types.insert("Bravo".into(), bravo);
        input.types.insert("Alpha".into(), alpha);
        input
            .data
            .insert("zulu".into(), DataEntry::new(serde_json::json!("z"), string));
        input
            .routes
            .insert("aRoute".into(), Route::new("GET", "/a", string));

        let items = build_items(&graph, &input).unwrap();
        let names: Vec<_> = items.iter().map(EmissionItem::name).collect();
        assert_eq!(names, vec!["Alpha", "Bravo", "aRoute", "zulu"]);
    }

    #[test]
    fn test_data_item() {
        let mut graph = TypeGraph::new();
        let string = graph.scalar(Kind::String);
        let group = graph.named(
            "Group",
            Shape::Struct(vec![StructField::new("Name", string).json("groupName")]),
        );

        let mut input = GenerationInput::default();
        input.types.insert("group".into(), group);
        input.data.insert(
            "foobar".into(),
            DataEntry::new(serde_json::json!({ "groupName": "hello there" }), group),
        );

        let items = build_items(&graph, &input).unwrap();
        let Some(EmissionItem::Data(data)) = items.last() else {
            panic!("expected data item last");
        };
        assert_eq!(data.ts_type, "group");
        assert_eq!(data.value["groupName"], "hello there");
    }

    #[test]
    fn test_undefined_declaration_fails() {
        let mut graph = TypeGraph::new();
        let pending = graph.declare("Pending");

        let mut input = GenerationInput::default();
        input.types.insert("Pending".into(), pending);

        assert!(build_items(&graph, &input).is_err());
    }

    #[test]
    fn test_default_namespace() {
        let mut input = GenerationInput::default();
        assert_eq!(input.namespace(), "GoGenerated");
        input.namespace = Some("Api".into());
        assert_eq!(input.namespace(), "Api");
    }
}
