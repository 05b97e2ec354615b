//! Core types for the tsmirror TypeScript generator.
//!
//! This crate holds the type graph that describes source types, the registry
//! that maps them to TypeScript names, and the conversion of types, routes and
//! data into emission-ready items. Emitters live in `tsmirror-codegen`.

mod convert;
mod describe;
mod error;
mod fields;
mod graph;
mod items;
mod registry;
mod tag;

// Type graph
pub use describe::Describe;
pub use graph::{Kind, Shape, StructField, TypeDef, TypeGraph, TypeId};
// Errors
pub use error::{CoreError, Result};
// Conversion
pub use convert::Converter;
pub use fields::{FieldEnumerator, FieldMetadata, JSON_TAG};
pub use registry::{Registry, TS_ANY, TS_BOOLEAN, TS_NUMBER, TS_STRING, TS_UNKNOWN};
pub use tag::{FieldTag, PropertyName, StructTag, is_identifier};
// Emission items
pub use items::{
    DEFAULT_NAMESPACE, DataEntry, DataLiteral, EmissionItem, GenerationInput, ItemBuilder, Route,
    RouteDefinition, RouteParam, TypeDefinition, build_items,
};
