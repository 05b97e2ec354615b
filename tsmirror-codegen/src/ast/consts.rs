//! Typed constant declarations holding JSON data.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::builder::{CodeBuilder, CodeFragment, Renderable};

/// `export const name: <ty> = <value>`
///
/// The value is rendered as pretty-printed JSON with tab indentation. Lines
/// after the first follow the indentation of the declaration.
#[derive(Debug, Clone)]
pub struct Const {
    name: String,
    ty: String,
    value: String,
}

impl Const {
    /// A constant whose value is already TypeScript source.
    pub fn new(name: impl Into<String>, ty: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            value: value.into(),
        }
    }

    /// A constant holding `value` serialized as JSON.
    pub fn json(
        name: impl Into<String>,
        ty: impl Into<String>,
        value: &impl Serialize,
    ) -> serde_json::Result<Self> {
        Ok(Self::new(name, ty, to_json(value)?))
    }

    pub fn build(&self) -> String {
        let mut builder = CodeBuilder::default();
        builder.emit(self);
        builder.build()
    }
}

impl Renderable for Const {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut lines = self.value.lines();
        let first = lines.next().unwrap_or_default();

        let mut fragments = vec![CodeFragment::Line(format!(
            "export const {}: {} = {}",
            self.name, self.ty, first
        ))];
        fragments.extend(lines.map(CodeFragment::line));
        fragments
    }
}

fn to_json(value: &impl Serialize) -> serde_json::Result<String> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut serializer)?;
    // serde_json only writes valid UTF-8.
    Ok(String::from_utf8_lossy(&out).into_owned())
}
