//! Fragments produced by AST nodes and consumed by [`CodeBuilder`](super::CodeBuilder).

/// A piece of generated code, independent of the current indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeFragment {
    /// One line, indented to the current depth.
    Line(String),
    /// A blank line, never indented.
    Blank,
    /// `header`, the body one level deeper, then `close` if any.
    Block {
        header: String,
        body: Vec<CodeFragment>,
        close: Option<String>,
    },
}

impl CodeFragment {
    pub fn line(s: impl Into<String>) -> Self {
        Self::Line(s.into())
    }

    pub fn block(
        header: impl Into<String>,
        body: Vec<CodeFragment>,
        close: Option<String>,
    ) -> Self {
        Self::Block {
            header: header.into(),
            body,
            close,
        }
    }
}

/// A declaration or statement that knows its own layout.
pub trait Renderable {
    fn to_fragments(&self) -> Vec<CodeFragment>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(
            CodeFragment::line("test"),
            CodeFragment::Line("test".to_string())
        );
        assert_eq!(
            CodeFragment::block("{", vec![CodeFragment::line("a")], None),
            CodeFragment::Block {
                header: "{".to_string(),
                body: vec![CodeFragment::Line("a".to_string())],
                close: None,
            }
        );
    }
}
