//! TypeScript type alias and object type builders.

use tsmirror_core::{FieldMetadata, PropertyName};

use crate::builder::{CodeBuilder, CodeFragment, Renderable};

/// A property of a TypeScript object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: PropertyName,
    pub ty: String,
    pub optional: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: PropertyName::new(name),
            ty: ty.into(),
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl From<&FieldMetadata> for Field {
    fn from(field: &FieldMetadata) -> Self {
        Self {
            name: field.display.clone(),
            ty: field.ts_type.clone(),
            optional: field.optional,
        }
    }
}

/// `export type Name = { ... }`
#[derive(Debug, Clone)]
pub struct ObjectType {
    name: String,
    fields: Vec<Field>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Build the object type as a string.
    pub fn build(&self) -> String {
        let mut builder = CodeBuilder::default();
        builder.emit(self);
        builder.build()
    }
}

impl Renderable for ObjectType {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let body = self
            .fields
            .iter()
            .map(|field| {
                let optional = if field.optional { "?" } else { "" };
                CodeFragment::Line(format!("{}{}: {}", field.name, optional, field.ty))
            })
            .collect();

        vec![CodeFragment::block(
            format!("export type {} = {{", self.name),
            body,
            Some("}".to_string()),
        )]
    }
}

/// `export type Name = <ty>`
#[derive(Debug, Clone)]
pub struct TypeAlias {
    name: String,
    ty: String,
}

impl TypeAlias {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    pub fn build(&self) -> String {
        let mut builder = CodeBuilder::default();
        builder.emit(self);
        builder.build()
    }
}

impl Renderable for TypeAlias {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        vec![CodeFragment::Line(format!(
            "export type {} = {}",
            self.name, self.ty
        ))]
    }
}
