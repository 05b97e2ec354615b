//! Go-like type expressions used in manifests, e.g. `map[string][]*Group`.

use std::fmt;

use thiserror::Error;
use tsmirror_core::Kind;

/// A parsed type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A builtin or declared type name.
    Named(String),
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array { len: usize, elem: Box<TypeExpr> },
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
}

/// A type expression that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct ExprError {
    pub offset: usize,
    pub message: String,
}

/// Builtin names that resolve to a well-known type rather than a scalar kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnown {
    Any,
    Timestamp,
    Duration,
}

impl TypeExpr {
    pub fn parse(src: &str) -> Result<Self, ExprError> {
        let mut parser = Parser { src, pos: 0 };
        let expr = parser.expr()?;
        parser.skip_ws();
        if parser.pos < src.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(expr)
    }

    /// The name of a plain named reference.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Name a field embedding this type is known by: the type name without
    /// pointer or package qualifier.
    pub fn embedded_name(&self) -> Option<&str> {
        let name = match self {
            Self::Named(name) => name.as_str(),
            Self::Pointer(elem) => elem.as_name()?,
            _ => return None,
        };
        name.rsplit('.').next()
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Pointer(elem) => write!(f, "*{}", elem),
            Self::Slice(elem) => write!(f, "[]{}", elem),
            Self::Array { len, elem } => write!(f, "[{}]{}", len, elem),
            Self::Map { key, value } => write!(f, "map[{}]{}", key, value),
        }
    }
}

/// Scalar kind of a builtin type name.
pub fn builtin_kind(name: &str) -> Option<Kind> {
    let kind = match name {
        "bool" => Kind::Bool,
        "int" => Kind::Int,
        "int8" => Kind::Int8,
        "int16" => Kind::Int16,
        "int32" | "rune" => Kind::Int32,
        "int64" => Kind::Int64,
        "uint" => Kind::Uint,
        "uint8" | "byte" => Kind::Uint8,
        "uint16" => Kind::Uint16,
        "uint32" => Kind::Uint32,
        "uint64" => Kind::Uint64,
        "uintptr" => Kind::Uintptr,
        "float32" => Kind::Float32,
        "float64" => Kind::Float64,
        "complex64" => Kind::Complex64,
        "complex128" => Kind::Complex128,
        "string" => Kind::String,
        _ => return None,
    };
    Some(kind)
}

pub fn well_known(name: &str) -> Option<WellKnown> {
    match name {
        "any" | "interface{}" => Some(WellKnown::Any),
        "Timestamp" | "time.Time" => Some(WellKnown::Timestamp),
        "Duration" | "time.Duration" => Some(WellKnown::Duration),
        _ => None,
    }
}

/// Whether `name` is reserved by a builtin type.
pub fn is_builtin(name: &str) -> bool {
    builtin_kind(name).is_some() || well_known(name).is_some()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn expr(&mut self) -> Result<TypeExpr, ExprError> {
        self.skip_ws();
        let rest = &self.src[self.pos..];

        if rest.starts_with('*') {
            self.pos += 1;
            return Ok(TypeExpr::Pointer(Box::new(self.expr()?)));
        }

        if rest.starts_with('[') {
            self.pos += 1;
            self.skip_ws();
            if self.eat(']') {
                return Ok(TypeExpr::Slice(Box::new(self.expr()?)));
            }
            let len = self.number()?;
            self.skip_ws();
            if !self.eat(']') {
                return Err(self.error("expected ']'"));
            }
            return Ok(TypeExpr::Array {
                len,
                elem: Box::new(self.expr()?),
            });
        }

        if rest.starts_with("map[") {
            self.pos += 4;
            let key = self.expr()?;
            self.skip_ws();
            if !self.eat(']') {
                return Err(self.error("expected ']' after map key"));
            }
            let value = self.expr()?;
            return Ok(TypeExpr::Map {
                key: Box::new(key),
                value: Box::new(value),
            });
        }

        if rest.starts_with("interface{") {
            self.pos += "interface{".len();
            self.skip_ws();
            if !self.eat('}') {
                return Err(self.error("only the empty interface is supported"));
            }
            return Ok(TypeExpr::Named("interface{}".to_string()));
        }

        self.name()
    }

    fn name(&mut self) -> Result<TypeExpr, ExprError> {
        let start = self.pos;
        let mut segment_start = true;
        for c in self.src[start..].chars() {
            let valid = if segment_start {
                c.is_alphabetic() || c == '_'
            } else {
                c.is_alphanumeric() || c == '_' || c == '.'
            };
            if !valid {
                break;
            }
            segment_start = c == '.';
            self.pos += c.len_utf8();
        }

        if self.pos == start {
            return Err(self.error("expected a type"));
        }
        if segment_start {
            return Err(self.error("expected a name after '.'"));
        }
        Ok(TypeExpr::Named(self.src[start..self.pos].to_string()))
    }

    fn number(&mut self) -> Result<usize, ExprError> {
        let start = self.pos;
        let digits = self.src[start..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if digits == 0 {
            return Err(self.error("expected ']' or an array length"));
        }
        self.pos += digits;
        self.src[start..self.pos].parse().map_err(|_| ExprError {
            offset: start,
            message: "array length is too large".to_string(),
        })
    }

    fn eat(&mut self, c: char) -> bool {
        if self.src[self.pos..].starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        let ws = self.src[self.pos..]
            .bytes()
            .take_while(u8::is_ascii_whitespace)
            .count();
        self.pos += ws;
    }

    fn error(&self, message: &str) -> ExprError {
        ExprError {
            offset: self.pos,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Box<TypeExpr> {
        Box::new(TypeExpr::Named(name.to_string()))
    }

    #[test]
    fn test_names() {
        assert_eq!(TypeExpr::parse("Group").unwrap(), *named("Group"));
        assert_eq!(TypeExpr::parse(" time.Time ").unwrap(), *named("time.Time"));
        assert_eq!(TypeExpr::parse("interface{}").unwrap(), *named("interface{}"));
        assert_eq!(TypeExpr::parse("interface{ }").unwrap(), *named("interface{}"));
    }

    #[test]
    fn test_composites() {
        assert_eq!(
            TypeExpr::parse("map[string][]*Group").unwrap(),
            TypeExpr::Map {
                key: named("string"),
                value: Box::new(TypeExpr::Slice(Box::new(TypeExpr::Pointer(named("Group"))))),
            }
        );
        assert_eq!(
            TypeExpr::parse("[16]byte").unwrap(),
            TypeExpr::Array {
                len: 16,
                elem: named("byte"),
            }
        );
        assert_eq!(
            TypeExpr::parse("*[]User").unwrap(),
            TypeExpr::Pointer(Box::new(TypeExpr::Slice(named("User"))))
        );
    }

    #[test]
    fn test_display() {
        for src in ["map[UserID]bool", "*[]User", "[4]map[string]any", "time.Duration"] {
            assert_eq!(TypeExpr::parse(src).unwrap().to_string(), src);
        }
    }

    #[test]
    fn test_errors() {
        let err = TypeExpr::parse("map[string").unwrap_err();
        assert_eq!(err.offset, 10);

        assert!(TypeExpr::parse("").is_err());
        assert!(TypeExpr::parse("[]").is_err());
        assert!(TypeExpr::parse("Group extra").is_err());
        assert!(TypeExpr::parse("[x]int").is_err());
        assert!(TypeExpr::parse("time.").is_err());
        assert!(TypeExpr::parse("interface{ Read() }").is_err());
    }

    #[test]
    fn test_embedded_name() {
        let embedded = |src: &str| {
            TypeExpr::parse(src)
                .unwrap()
                .embedded_name()
                .map(str::to_string)
        };
        assert_eq!(embedded("Base").as_deref(), Some("Base"));
        assert_eq!(embedded("*Base").as_deref(), Some("Base"));
        assert_eq!(embedded("time.Time").as_deref(), Some("Time"));
        assert_eq!(embedded("[]Base"), None);
    }

    #[test]
    fn test_builtins() {
        assert_eq!(builtin_kind("byte"), Some(Kind::Uint8));
        assert_eq!(builtin_kind("rune"), Some(Kind::Int32));
        assert_eq!(builtin_kind("Group"), None);
        assert_eq!(well_known("time.Time"), Some(WellKnown::Timestamp));
        assert!(is_builtin("any"));
        assert!(!is_builtin("Any"));
    }
}
