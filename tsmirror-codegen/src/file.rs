//! Assembly of the generated TypeScript file.

use tsmirror_core::DEFAULT_NAMESPACE;

use crate::builder::{CodeBuilder, CodeFragment, Renderable};

/// Banner written at the top of every generated file.
pub const HEADER: &str = "// NOTE: This file was auto-generated\n// and should NOT be edited manually.\n";

/// A file exporting every declaration inside one namespace.
///
/// ```
/// use tsmirror_codegen::{ast::TypeAlias, file::NamespaceFile};
///
/// let file = NamespaceFile::new("Api")
///     .add(TypeAlias::new("Id", "number"))
///     .render();
///
/// assert!(file.ends_with("export namespace Api {\n\texport type Id = number\n}\n"));
/// ```
#[derive(Debug, Clone)]
pub struct NamespaceFile {
    namespace: String,
    body: Vec<Vec<CodeFragment>>,
}

impl Default for NamespaceFile {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl NamespaceFile {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            body: Vec::new(),
        }
    }

    /// Add a declaration.
    #[allow(clippy::should_implement_trait)]
    pub fn add<R: Renderable>(mut self, node: R) -> Self {
        self.body.push(node.to_fragments());
        self
    }

    /// Add multiple declarations.
    pub fn add_all<R: Renderable>(mut self, nodes: impl IntoIterator<Item = R>) -> Self {
        self.body
            .extend(nodes.into_iter().map(|node| node.to_fragments()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Render the file with tab indentation.
    pub fn render(&self) -> String {
        let mut builder = CodeBuilder::default();

        for line in HEADER.lines() {
            builder.push_line(line);
        }
        builder.push_blank();

        builder.push_line(&format!("export namespace {} {{", self.namespace));
        builder.push_indent();
        for (i, fragments) in self.body.iter().enumerate() {
            if i > 0 {
                builder.push_blank();
            }
            for fragment in fragments {
                builder.apply_fragment(fragment.clone());
            }
        }
        builder.push_dedent();
        builder.push_line("}");

        builder.build()
    }
}
