//! Serialization annotations on struct members.

use std::fmt;

/// Structured form of a member's `json` annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTag {
    /// Property name to use instead of the declared member name.
    pub rename: Option<String>,
    /// The member is excluded entirely (`"-"`).
    pub ignored: bool,
    /// The member may be absent (`omitempty`).
    pub omit_empty: bool,
}

impl FieldTag {
    /// Parse an annotation value such as `groupName,omitempty`.
    ///
    /// Unknown modifiers are ignored.
    pub fn parse(raw: &str) -> Self {
        if raw == "-" {
            return Self {
                ignored: true,
                ..Self::default()
            };
        }

        let mut parts = raw.split(',');
        let rename = parts
            .next()
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let omit_empty = parts.any(|part| part.contains("omitempty"));

        Self {
            rename,
            ignored: false,
            omit_empty,
        }
    }
}

/// Raw struct tag, e.g. `json:"name,omitempty" xml:"name"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StructTag(String);

impl StructTag {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// A tag holding only a `json` entry.
    pub fn json(value: &str) -> Self {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        Self(format!("json:\"{}\"", escaped))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value associated with `key`.
    ///
    /// Entries are `key:"value"` pairs separated by spaces. Scanning stops at
    /// the first malformed entry, which makes the rest of the tag invisible.
    pub fn get(&self, key: &str) -> Option<String> {
        let bytes = self.0.as_bytes();
        let mut pos = 0;

        loop {
            while pos < bytes.len() && bytes[pos] == b' ' {
                pos += 1;
            }
            if pos >= bytes.len() {
                return None;
            }

            let name_start = pos;
            while pos < bytes.len()
                && bytes[pos] > b' '
                && bytes[pos] != b':'
                && bytes[pos] != b'"'
                && bytes[pos] != 0x7f
            {
                pos += 1;
            }
            if pos == name_start
                || pos + 1 >= bytes.len()
                || bytes[pos] != b':'
                || bytes[pos + 1] != b'"'
            {
                return None;
            }
            let name = &self.0[name_start..pos];

            // Skip `:"` and scan to the closing quote.
            pos += 2;
            let value_start = pos;
            while pos < bytes.len() && bytes[pos] != b'"' {
                if bytes[pos] == b'\\' {
                    pos += 1;
                }
                pos += 1;
            }
            if pos >= bytes.len() {
                return None;
            }
            let value = &self.0[value_start..pos];
            pos += 1;

            if name == key {
                return Some(unescape(value));
            }
        }
    }
}

impl From<&str> for StructTag {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for StructTag {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Property name as it appears in a TypeScript object type.
///
/// Names that are not valid identifiers are quoted and must be accessed with
/// bracket notation, e.g. `obj["@timestamp"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyName {
    Bare(String),
    Quoted(String),
}

impl PropertyName {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if is_identifier(&name) {
            Self::Bare(name)
        } else {
            Self::Quoted(name)
        }
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bare(name) => f.write_str(name),
            Self::Quoted(name) => {
                let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "\"{}\"", escaped)
            }
        }
    }
}

/// Whether `name` can be written as a bare TypeScript property name.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignored() {
        let tag = FieldTag::parse("-");
        assert!(tag.ignored);
        assert_eq!(tag.rename, None);
    }

    #[test]
    fn test_parse_rename_only() {
        let tag = FieldTag::parse("groupName");
        assert_eq!(tag.rename.as_deref(), Some("groupName"));
        assert!(!tag.omit_empty);
        assert!(!tag.ignored);
    }

    #[test]
    fn test_parse_rename_with_omitempty() {
        let tag = FieldTag::parse("secondaryGroup,omitempty");
        assert_eq!(tag.rename.as_deref(), Some("secondaryGroup"));
        assert!(tag.omit_empty);
    }

    #[test]
    fn test_parse_modifier_without_rename() {
        let tag = FieldTag::parse(",omitempty");
        assert_eq!(tag.rename, None);
        assert!(tag.omit_empty);
    }

    #[test]
    fn test_parse_unknown_modifiers_ignored() {
        let tag = FieldTag::parse("id,string,inline");
        assert_eq!(tag.rename.as_deref(), Some("id"));
        assert!(!tag.omit_empty);
        assert!(!tag.ignored);
    }

    #[test]
    fn test_parse_dash_with_comma_is_a_rename() {
        let tag = FieldTag::parse("-,");
        assert!(!tag.ignored);
        assert_eq!(tag.rename.as_deref(), Some("-"));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(FieldTag::parse(""), FieldTag::default());
    }

    #[test]
    fn test_struct_tag_lookup() {
        let tag = StructTag::new(r#"json:"name,omitempty" xml:"n" db:"user_name""#);
        assert_eq!(tag.get("json").as_deref(), Some("name,omitempty"));
        assert_eq!(tag.get("xml").as_deref(), Some("n"));
        assert_eq!(tag.get("db").as_deref(), Some("user_name"));
        assert_eq!(tag.get("yaml"), None);
    }

    #[test]
    fn test_struct_tag_escapes() {
        let tag = StructTag::json(r#"we"ird"#);
        assert_eq!(tag.as_str(), r#"json:"we\"ird""#);
        assert_eq!(tag.get("json").as_deref(), Some(r#"we"ird"#));
    }

    #[test]
    fn test_struct_tag_malformed_stops_scanning() {
        let tag = StructTag::new(r#"json:name xml:"n""#);
        assert_eq!(tag.get("xml"), None);

        let unterminated = StructTag::new(r#"json:"name"#);
        assert_eq!(unterminated.get("json"), None);
    }

    #[test]
    fn test_property_names() {
        assert_eq!(PropertyName::new("Username").to_string(), "Username");
        assert_eq!(PropertyName::new("user_tags").to_string(), "user_tags");
        assert_eq!(PropertyName::new("@timestamp").to_string(), "\"@timestamp\"");
        assert_eq!(PropertyName::new("first name").to_string(), "\"first name\"");
        assert_eq!(PropertyName::new("content-type").to_string(), "\"content-type\"");
        assert!(matches!(PropertyName::new("1st"), PropertyName::Quoted(_)));
        assert!(matches!(PropertyName::new("$ref"), PropertyName::Bare(_)));
    }
}
