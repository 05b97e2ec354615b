//! Validation context and utilities for manifest parsing.

use std::sync::Arc;

use miette::SourceSpan;
use tsmirror_core::is_identifier;

use crate::{
    Error, Result,
    error::SourceContext,
    expr::{TypeExpr, is_builtin},
};

/// Parsing and validation context that carries source information.
///
/// Holds the source and the current path through the manifest, e.g.
/// `["declarations", "Group"]`, so nested errors can say where they occurred.
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    source: Arc<SourceContext>,
    path: Vec<&'a str>,
}

impl<'a> ParseContext<'a> {
    pub fn new(source: SourceContext) -> Self {
        Self {
            source: Arc::new(source),
            path: Vec::new(),
        }
    }

    pub fn source_context(&self) -> &SourceContext {
        &self.source
    }

    /// Push a path segment and return a new context.
    pub fn push(&self, segment: &'a str) -> Self {
        let mut path = self.path.clone();
        path.push(segment);
        Self {
            source: Arc::clone(&self.source),
            path,
        }
    }

    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// Context description for error messages, e.g. "field in 'declarations.Group'".
    pub fn context_for(&self, kind: &str) -> String {
        if self.path.is_empty() {
            kind.to_string()
        } else {
            format!("{} in '{}'", kind, self.path_string())
        }
    }

    pub fn find_key_span(&self, name: &str) -> Option<SourceSpan> {
        find_key_span(self.source.src(), name)
    }

    pub fn find_value_span(&self, value: &str) -> Option<SourceSpan> {
        find_value_span(self.source.src(), value)
    }

    /// Validate a name exposed in the generated TypeScript.
    pub fn validate_exposed_name(&self, name: &str, kind: &str) -> Result<()> {
        if let Some(reason) = validate_exposed_name(name) {
            return Err(self.source.invalid_identifier_error(
                name,
                self.context_for(kind),
                reason,
                self.find_key_span(name),
            ));
        }
        Ok(())
    }

    /// Validate the name of a source declaration or struct member.
    pub fn validate_source_name(&self, name: &str, kind: &str) -> Result<()> {
        if let Some(reason) = validate_source_name(name) {
            return Err(self.source.invalid_identifier_error(
                name,
                self.context_for(kind),
                reason,
                self.find_key_span(name),
            ));
        }
        Ok(())
    }

    /// Validate the name of a struct member.
    pub fn validate_member_name(&self, name: &str) -> Result<()> {
        if let Some(reason) = validate_member_name(name) {
            return Err(self.source.invalid_identifier_error(
                name,
                self.context_for("field"),
                reason,
                self.find_key_span(name),
            ));
        }
        Ok(())
    }

    /// Parse a type expression, reporting syntax errors at their position.
    pub fn parse_type(&self, raw: &str) -> Result<TypeExpr> {
        TypeExpr::parse(raw).map_err(|err| {
            let span = self.find_value_span(raw).map(|span| {
                let offset = span.offset() + err.offset.min(raw.len());
                SourceSpan::from((offset, 1))
            });
            self.source.type_expr_error(raw, err.message, span)
        })
    }

    pub fn validation_error(
        &self,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        self.source.validation_error(message, span)
    }
}

/// TypeScript reserved words that cannot name a type or constant.
pub(crate) const TS_KEYWORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while", "with",
];

/// Returns None if valid, Some(reason) if invalid.
pub(crate) fn validate_exposed_name(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("name cannot be empty");
    }
    if TS_KEYWORDS.contains(&name) {
        return Some("name is a TypeScript reserved word");
    }
    if !is_identifier(name) {
        return Some("use only letters, digits, '_' and '$', not starting with a digit");
    }
    None
}

/// Returns None if valid, Some(reason) if invalid.
pub(crate) fn validate_source_name(name: &str) -> Option<&'static str> {
    if let Some(reason) = validate_member_name(name) {
        return Some(reason);
    }
    if is_builtin(name) {
        return Some("name is already a builtin type");
    }
    None
}

/// Returns None if valid, Some(reason) if invalid.
pub(crate) fn validate_member_name(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        Some(_) => return Some("name must start with a letter or underscore"),
        None => return Some("name cannot be empty"),
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '_') {
        return Some("name must contain only letters, digits and underscores");
    }
    None
}

/// Find the span of a key in the TOML source.
///
/// Searches for table headers (`.name]`, `.name.`), inline tables
/// (`{ name =`, `, name =`), bare keys at the start of a line and
/// `name = "value"` entries.
pub(crate) fn find_key_span(src: &str, name: &str) -> Option<SourceSpan> {
    for pattern in [format!(".{}]", name), format!(".{}.", name)] {
        if let Some(pos) = src.find(&pattern) {
            return Some(SourceSpan::from((pos + 1, name.len())));
        }
    }

    let inline_patterns = [
        (format!("{{ {} ", name), 2usize),
        (format!("{{ {}=", name), 2usize),
        (format!("{{{}=", name), 1usize),
        (format!(", {} ", name), 2usize),
        (format!(", {}=", name), 2usize),
        (format!(",{}=", name), 1usize),
        (format!("\n{} ", name), 1usize),
        (format!("\n{}=", name), 1usize),
    ];
    for (pattern, skip) in &inline_patterns {
        if let Some(pos) = src.find(pattern.as_str()) {
            return Some(SourceSpan::from((pos + skip, name.len())));
        }
    }

    if src.starts_with(&format!("{} ", name)) || src.starts_with(&format!("{}=", name)) {
        return Some(SourceSpan::from((0, name.len())));
    }

    find_value_span(src, name)
}

/// Find the span of a quoted string value in the TOML source, excluding quotes.
pub(crate) fn find_value_span(src: &str, value: &str) -> Option<SourceSpan> {
    for quote in ['"', '\''] {
        let pattern = format!("{quote}{value}{quote}");
        if let Some(pos) = src.find(&pattern) {
            return Some(SourceSpan::from((pos + 1, value.len())));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exposed_names() {
        assert!(validate_exposed_name("group").is_none());
        assert!(validate_exposed_name("TestUserID").is_none());
        assert!(validate_exposed_name("$ref").is_none());
        assert!(validate_exposed_name("default").is_some());
        assert!(validate_exposed_name("user-id").is_some());
        assert!(validate_exposed_name("1st").is_some());
        assert!(validate_exposed_name("").is_some());
    }

    #[test]
    fn test_source_names() {
        assert!(validate_source_name("Group").is_none());
        assert!(validate_source_name("_internal").is_none());
        assert!(validate_source_name("string").is_some());
        assert!(validate_source_name("Timestamp").is_some());
        assert!(validate_source_name("my-type").is_some());
        assert!(validate_source_name("9lives").is_some());

        assert!(validate_member_name("Timestamp").is_none());
        assert!(validate_member_name("my-field").is_some());
    }

    #[test]
    fn test_find_key_span() {
        let src = "[declarations.Group]\nunderlying = \"string\"\n";
        let span = find_key_span(src, "Group").unwrap();
        assert_eq!(span.offset(), 14);
        assert_eq!(span.len(), 5);

        let src = "[types]\nTestUserID = \"UserID\"\n";
        assert_eq!(find_key_span(src, "TestUserID").unwrap().offset(), 8);

        let src = "query = { userID = \"UserID\" }";
        assert_eq!(find_key_span(src, "userID").unwrap().offset(), 10);

        assert!(find_key_span(src, "missing").is_none());
    }

    #[test]
    fn test_find_value_span() {
        let src = "response = '[]Group'";
        let span = find_value_span(src, "[]Group").unwrap();
        assert_eq!(span.offset(), 12);
        assert_eq!(span.len(), 7);
    }

    #[test]
    fn test_context_for() {
        let ctx = ParseContext::new(SourceContext::default());
        assert_eq!(ctx.context_for("route"), "route");
        let nested = ctx.push("declarations").push("Group");
        assert_eq!(nested.context_for("field"), "field in 'declarations.Group'");
    }

    #[test]
    fn test_parse_type_error_points_into_value() {
        let src = "[types]\nBroken = \"map[string\"\n";
        let ctx = ParseContext::new(SourceContext::new(src, "tsmirror.toml"));
        let err = ctx.parse_type("map[string").unwrap_err();
        match *err {
            crate::Error::InvalidTypeExpr { span, .. } => {
                assert_eq!(span.unwrap().offset(), 18 + 10);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
