//! Manifest types and parsing for tsmirror.toml files.

mod file;
mod lower;
mod parse;
mod validate;

use std::path::PathBuf;

pub use file::ManifestFile;
use indexmap::IndexMap;
use serde::Deserialize;
pub use validate::ParseContext;

use crate::error::SourceContext;

/// Root manifest for tsmirror.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub output: Output,

    /// Source type declarations, by type name.
    #[serde(default)]
    pub declarations: IndexMap<String, Declaration>,

    /// Exposed types: TypeScript name to type expression.
    #[serde(default)]
    pub types: IndexMap<String, String>,

    #[serde(default)]
    pub routes: IndexMap<String, RouteConfig>,

    #[serde(default)]
    pub data: IndexMap<String, DataConfig>,

    /// Type expression (or builtin kind name) to TypeScript type.
    #[serde(default)]
    pub overrides: IndexMap<String, String>,

    #[serde(skip)]
    source: SourceContext,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Output {
    /// Namespace wrapping the generated declarations.
    pub namespace: Option<String>,
    /// Destination file, relative to the manifest.
    pub path: Option<PathBuf>,
}

/// A declared source type: a struct with `fields`, or a defined type with an
/// `underlying` type expression.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Declaration {
    pub fields: Option<Vec<FieldConfig>>,
    pub underlying: Option<String>,
    /// Values of this type serialize as strings.
    #[serde(default)]
    pub stringer: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    /// Member name; embedded members default to their type name.
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: String,
    /// Value of the `json` struct tag.
    pub json: Option<String>,
    /// Raw struct tag, e.g. `json:"name,omitempty"`.
    pub tag: Option<String>,
    #[serde(default)]
    pub embedded: bool,
    /// Defaults to whether the name starts with an uppercase letter.
    pub exported: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    pub path: String,
    #[serde(default = "default_method")]
    pub method: String,
    pub response: String,
    pub request: Option<String>,
    #[serde(default)]
    pub query: IndexMap<String, String>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// A constant to export. The value is given either as TOML or, for values
/// TOML cannot express such as `null`, as a JSON string.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    #[serde(rename = "type")]
    pub ty: String,
    pub value: Option<toml::Value>,
    pub json: Option<String>,
}

impl Manifest {
    /// Source the manifest was parsed from.
    pub fn source(&self) -> &SourceContext {
        &self.source
    }

    /// Namespace from `[output]`, if set.
    pub fn namespace(&self) -> Option<&str> {
        self.output.namespace.as_deref()
    }
}

impl FieldConfig {
    /// Member name, falling back to the embedded type name.
    pub fn member_name(&self) -> Option<String> {
        if let Some(name) = &self.name {
            return Some(name.clone());
        }
        if !self.embedded {
            return None;
        }
        crate::TypeExpr::parse(&self.ty)
            .ok()?
            .embedded_name()
            .map(str::to_string)
    }

    /// Whether the member is visible, by explicit setting or by capitalization.
    pub fn is_exported(&self) -> bool {
        self.exported.unwrap_or_else(|| {
            self.member_name()
                .and_then(|name| name.chars().next())
                .is_some_and(char::is_uppercase)
        })
    }
}
