//! Manifest parsing from files and strings.

use std::{path::Path, str::FromStr};

use super::{Declaration, Manifest, validate::ParseContext};
use crate::{Error, MANIFEST_FILE, Result, error::SourceContext};

const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_manifest(s, MANIFEST_FILE)
    }
}

impl Manifest {
    /// Parse a tsmirror.toml file from the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        parse_manifest(&content, &path.display().to_string())
    }

    /// Parse a tsmirror.toml from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        parse_manifest(content, filename)
    }
}

/// Parse a manifest from content with the given filename for error reporting.
pub fn parse_manifest(content: &str, filename: &str) -> Result<Manifest> {
    let source = SourceContext::new(content, filename);
    let mut manifest: Manifest = toml::from_str(content).map_err(|e| source.parse_error(e))?;
    validate_manifest(&manifest, &ParseContext::new(source.clone()))?;
    manifest.source = source;
    Ok(manifest)
}

/// Syntax-level checks: names, type expressions and section shapes. Type
/// resolution happens when the manifest is lowered.
fn validate_manifest(manifest: &Manifest, ctx: &ParseContext<'_>) -> Result<()> {
    if let Some(namespace) = manifest.namespace() {
        for segment in namespace.split('.') {
            ctx.push("output")
                .validate_exposed_name(segment, "namespace")?;
        }
    }

    let declarations = ctx.push("declarations");
    for (name, declaration) in &manifest.declarations {
        declarations.validate_source_name(name, "declaration")?;
        validate_declaration(name, declaration, &declarations.push(name))?;
    }

    let types = ctx.push("types");
    for (name, expr) in &manifest.types {
        types.validate_exposed_name(name, "type")?;
        types.parse_type(expr)?;
    }

    let routes = ctx.push("routes");
    for (name, route) in &manifest.routes {
        routes.validate_exposed_name(name, "route")?;
        let route_ctx = routes.push(name);

        if route.path.is_empty() {
            return Err(route_ctx.validation_error(
                format!("route '{}' has an empty path", name),
                route_ctx.find_key_span(name),
            ));
        }
        if !HTTP_METHODS.contains(&route.method.to_ascii_uppercase().as_str()) {
            return Err(route_ctx.validation_error(
                format!(
                    "unsupported HTTP method '{}' (expected one of {})",
                    route.method,
                    HTTP_METHODS.join(", ")
                ),
                route_ctx.find_value_span(&route.method),
            ));
        }

        route_ctx.parse_type(&route.response)?;
        if let Some(request) = &route.request {
            route_ctx.parse_type(request)?;
        }
        for (param, expr) in &route.query {
            route_ctx.validate_exposed_name(param, "query parameter")?;
            route_ctx.parse_type(expr)?;
        }
    }

    let data = ctx.push("data");
    for (name, entry) in &manifest.data {
        data.validate_exposed_name(name, "data")?;
        data.parse_type(&entry.ty)?;
        match (&entry.value, &entry.json) {
            (Some(_), None) => {}
            (None, Some(json)) => {
                if let Err(err) = serde_json::from_str::<serde_json::Value>(json) {
                    return Err(data.validation_error(
                        format!("data '{}' holds invalid JSON: {}", name, err),
                        data.find_key_span(name),
                    ));
                }
            }
            _ => {
                return Err(data.validation_error(
                    format!("data '{}' needs exactly one of `value` or `json`", name),
                    data.find_key_span(name),
                ));
            }
        }
    }

    let overrides = ctx.push("overrides");
    for (expr, ts) in &manifest.overrides {
        overrides.parse_type(expr)?;
        if ts.trim().is_empty() {
            return Err(overrides.validation_error(
                format!("override for '{}' is empty", expr),
                overrides.find_key_span(expr),
            ));
        }
    }

    Ok(())
}

fn validate_declaration(
    name: &str,
    declaration: &Declaration,
    ctx: &ParseContext<'_>,
) -> Result<()> {
    match (&declaration.fields, &declaration.underlying) {
        (Some(_), Some(_)) | (None, None) => {
            return Err(ctx.validation_error(
                format!(
                    "declaration '{}' needs exactly one of `fields` or `underlying`",
                    name
                ),
                ctx.find_key_span(name),
            ));
        }
        (None, Some(underlying)) => {
            ctx.parse_type(underlying)?;
        }
        (Some(fields), None) => {
            for field in fields {
                ctx.parse_type(&field.ty)?;

                let Some(member) = field.member_name() else {
                    let message = if field.embedded {
                        format!("embedded field of type '{}' needs a name", field.ty)
                    } else {
                        format!("field of type '{}' needs a name", field.ty)
                    };
                    return Err(ctx.validation_error(message, ctx.find_value_span(&field.ty)));
                };
                if field.name.is_some() {
                    ctx.validate_member_name(&member)?;
                }

                if field.json.is_some() && field.tag.is_some() {
                    return Err(ctx.validation_error(
                        format!("field '{}' sets both `json` and `tag`", member),
                        ctx.find_key_span(&member),
                    ));
                }
            }
        }
    }
    Ok(())
}
