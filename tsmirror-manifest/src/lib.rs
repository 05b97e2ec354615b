// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Manifest format for tsmirror.
//!
//! A `tsmirror.toml` declares source types, the names they are exposed under,
//! HTTP routes and constant data. [`Manifest::lower`] turns it into the type
//! graph and generation input consumed by `tsmirror-codegen`.

mod error;
mod expr;
mod manifest;

pub use error::{Error, Result, SourceContext};
pub use expr::{ExprError, TypeExpr, builtin_kind, is_builtin};
pub use manifest::{
    DataConfig, Declaration, FieldConfig, Manifest, ManifestFile, Output, ParseContext,
    RouteConfig,
};

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "tsmirror.toml";

/// Manifest written by `tsmirror init`.
pub const STARTER_MANIFEST: &str = r#"[output]
namespace = "GoGenerated"
path = "generated/api.ts"

[declarations.UserID]
underlying = "uint64"

[declarations.User]
fields = [
    { name = "ID", type = "UserID", json = "id" },
    { name = "Name", type = "string", json = "name" },
    { name = "Tags", type = "[]string", json = "tags,omitempty" },
    { name = "CreatedAt", type = "time.Time", json = "createdAt" },
]

[types]
UserID = "UserID"
User = "User"

[routes.userGet]
path = "/api/user"
method = "GET"
query = { id = "UserID" }
response = "User"

[data.defaultUser]
type = "User"
json = '{"id": 0, "name": "", "createdAt": "1970-01-01T00:00:00Z"}'
"#;
