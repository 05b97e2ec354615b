//! Line buffer with indentation tracking.

use super::{CodeFragment, Renderable};

const INDENT: &str = "\t";

/// Builds code line by line, prefixing each line with one tab per nesting level.
///
/// ```
/// use tsmirror_codegen::builder::CodeBuilder;
///
/// let mut builder = CodeBuilder::default();
/// builder
///     .push_line("export type User = {")
///     .push_indent()
///     .push_line("name: string")
///     .push_dedent()
///     .push_line("}");
///
/// assert_eq!(builder.build(), "export type User = {\n\tname: string\n}\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CodeBuilder {
    depth: usize,
    out: String,
}

impl CodeBuilder {
    pub fn push_line(&mut self, line: &str) -> &mut Self {
        self.out.extend(std::iter::repeat_n(INDENT, self.depth));
        self.out.push_str(line);
        self.out.push('\n');
        self
    }

    /// Blank lines never carry indentation.
    pub fn push_blank(&mut self) -> &mut Self {
        self.out.push('\n');
        self
    }

    pub fn push_indent(&mut self) -> &mut Self {
        self.depth += 1;
        self
    }

    /// Extra dedents are ignored.
    pub fn push_dedent(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self
    }

    pub fn emit(&mut self, node: &impl Renderable) -> &mut Self {
        node.to_fragments()
            .into_iter()
            .for_each(|fragment| self.apply_fragment(fragment));
        self
    }

    pub fn apply_fragment(&mut self, fragment: CodeFragment) {
        match fragment {
            CodeFragment::Line(line) => {
                self.push_line(&line);
            }
            CodeFragment::Blank => {
                self.push_blank();
            }
            CodeFragment::Block {
                header,
                body,
                close,
            } => {
                self.push_line(&header);
                self.nested(body);
                if let Some(close) = close {
                    self.push_line(&close);
                }
            }
        }
    }

    pub fn build(self) -> String {
        self.out
    }

    fn nested(&mut self, body: Vec<CodeFragment>) {
        self.depth += 1;
        for fragment in body {
            self.apply_fragment(fragment);
        }
        self.depth -= 1;
    }
}
