//! Entry point tying the type graph, emission items and file assembly together.

use std::{io::Write, path::Path};

use eyre::{Result, WrapErr};
use serde::Serialize;
use tracing::{debug, info, warn};
use tsmirror_core::{
    DataEntry, Describe, EmissionItem, GenerationInput, Kind, Route, TypeGraph, TypeId,
    build_items,
};

use crate::{ast::Declaration, file::NamespaceFile};

/// Outcome of writing the generated file to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// The file was created or its contents changed.
    Written,
    /// The file already had the generated contents.
    Unchanged,
}

/// Generates one TypeScript namespace file from a type graph.
///
/// ```
/// use tsmirror_codegen::Generator;
/// use tsmirror_core::{Kind, Shape, StructField, TypeGraph};
///
/// let mut graph = TypeGraph::new();
/// let string = graph.scalar(Kind::String);
/// let user = graph.named("User", Shape::Struct(vec![StructField::new("Username", string)]));
///
/// let output = Generator::new(graph)
///     .type_entry("TestUser", user)
///     .render()
///     .unwrap();
///
/// assert!(output.contains("\texport type TestUser = {\n\t\tUsername: string\n\t}\n"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Generator {
    graph: TypeGraph,
    input: GenerationInput,
}

impl Generator {
    pub fn new(graph: TypeGraph) -> Self {
        Self {
            graph,
            input: GenerationInput::default(),
        }
    }

    /// Generator for an already assembled input.
    pub fn from_parts(graph: TypeGraph, input: GenerationInput) -> Self {
        Self { graph, input }
    }

    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    /// Graph access for declaring more types.
    pub fn graph_mut(&mut self) -> &mut TypeGraph {
        &mut self.graph
    }

    pub fn input(&self) -> &GenerationInput {
        &self.input
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.input.namespace = Some(namespace.into());
        self
    }

    /// Expose several types by name.
    pub fn types<N: Into<String>>(mut self, types: impl IntoIterator<Item = (N, TypeId)>) -> Self {
        for (name, id) in types {
            self = self.type_entry(name, id);
        }
        self
    }

    /// Expose one type by name.
    pub fn type_entry(mut self, name: impl Into<String>, id: TypeId) -> Self {
        let name = name.into();
        if self.input.types.insert(name.clone(), id).is_some() {
            warn!(name = %name, "type entry replaced");
        }
        self
    }

    /// Expose the Rust type `T` by name.
    pub fn describe_type<T: Describe + ?Sized>(mut self, name: impl Into<String>) -> Self {
        let id = self.graph.describe::<T>();
        self.type_entry(name, id)
    }

    pub fn route(mut self, name: impl Into<String>, route: Route) -> Self {
        self.input.routes.insert(name.into(), route);
        self
    }

    pub fn data(mut self, name: impl Into<String>, entry: DataEntry) -> Self {
        self.input.data.insert(name.into(), entry);
        self
    }

    /// Export a Rust value as typed data. The type is taken from `T`.
    pub fn data_value<T: Serialize + Describe>(
        mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<Self> {
        let name = name.into();
        let json = serde_json::to_value(value)
            .wrap_err_with(|| format!("failed to encode data '{}'", name))?;
        let ty = self.graph.describe::<T>();
        Ok(self.data(name, DataEntry::new(json, ty)))
    }

    /// Map a specific type to a TypeScript type.
    pub fn override_type(mut self, id: TypeId, ts: impl Into<String>) -> Self {
        self.input.type_overrides.insert(id, ts.into());
        self
    }

    /// Map every type of a kind to a TypeScript type.
    pub fn override_kind(mut self, kind: Kind, ts: impl Into<String>) -> Self {
        self.input.kind_overrides.insert(kind, ts.into());
        self
    }

    /// Emission items in output order.
    pub fn items(&self) -> Result<Vec<EmissionItem>> {
        build_items(&self.graph, &self.input).wrap_err("failed to resolve types")
    }

    /// The assembled file, before rendering.
    pub fn file(&self) -> Result<NamespaceFile> {
        let items = self.items()?;
        let declarations = items
            .iter()
            .map(|item| {
                Declaration::try_from(item)
                    .wrap_err_with(|| format!("failed to encode data '{}'", item.name()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(NamespaceFile::new(self.input.namespace()).add_all(declarations))
    }

    /// Render the generated file.
    pub fn render(&self) -> Result<String> {
        let output = self.file()?.render();
        debug!(
            namespace = self.input.namespace(),
            bytes = output.len(),
            "rendered namespace"
        );
        Ok(output)
    }

    /// Render into `out`. Nothing is written when generation fails.
    pub fn generate(&self, out: &mut impl Write) -> Result<()> {
        let output = self.render()?;
        out.write_all(output.as_bytes())
            .wrap_err("failed to write generated output")?;
        Ok(())
    }

    /// Render to `path`, creating parent directories. An identical existing
    /// file is left untouched.
    pub fn write_to(&self, path: &Path) -> Result<WriteResult> {
        let output = self.render()?;

        if std::fs::read_to_string(path).is_ok_and(|existing| existing == output) {
            info!(path = %path.display(), "output unchanged");
            return Ok(WriteResult::Unchanged);
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(path, &output)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote generated file");
        Ok(WriteResult::Written)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;
    use tsmirror_core::{Shape, StructField};

    use super::*;

    #[test]
    fn test_empty_generator() {
        let output = Generator::default().render().unwrap();
        insta::assert_snapshot!(output, @r"
// NOTE: This file was auto-generated
// and should NOT be edited manually.

export namespace GoGenerated {
}
");
    }

    #[test]
    fn test_custom_namespace() {
        let output = Generator::default().namespace("Api").render().unwrap();
        assert!(output.contains("export namespace Api {\n}\n"));
    }

    #[test]
    fn test_generate_writes_everything() {
        let mut graph = TypeGraph::new();
        let user_id = graph.named("UserID", Shape::Scalar(Kind::Uint64));

        let generator = Generator::new(graph).type_entry("TestUserID", user_id);
        let mut out = Vec::new();
        generator.generate(&mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), generator.render().unwrap());
    }

    #[test]
    fn test_data_value_describes_rust_type() {
        let limits = BTreeMap::from([("max".to_string(), 10u32), ("min".to_string(), 1u32)]);
        let output = Generator::default()
            .data_value("limits", &limits)
            .unwrap()
            .data_value("tags", &vec!["a".to_string()])
            .unwrap()
            .render()
            .unwrap();

        insta::assert_snapshot!(output, @r#"
// NOTE: This file was auto-generated
// and should NOT be edited manually.

export namespace GoGenerated {
	export const limits: { [key: string]: number } | null = {
		"max": 10,
		"min": 1
	}

	export const tags: string[] | null = [
		"a"
	]
}
"#);
    }

    #[test]
    fn test_overrides() {
        let mut graph = TypeGraph::new();
        let int64 = graph.scalar(Kind::Int64);
        let decimal = graph.named("Decimal", Shape::Struct(Vec::new()));
        let invoice = graph.named(
            "Invoice",
            Shape::Struct(vec![
                StructField::new("Total", decimal),
                StructField::new("Count", int64),
            ]),
        );

        let output = Generator::new(graph)
            .type_entry("Invoice", invoice)
            .type_entry("Decimal", decimal)
            .override_type(decimal, "string")
            .override_kind(Kind::Int64, "bigint")
            .render()
            .unwrap();

        assert!(output.contains("\texport type Decimal = string\n"));
        assert!(output.contains("\t\tTotal: Decimal\n\t\tCount: bigint\n"));
    }

    #[test]
    fn test_undefined_type_fails_without_output() {
        let mut graph = TypeGraph::new();
        let pending = graph.declare("Pending");

        let generator = Generator::new(graph).type_entry("Pending", pending);
        let mut out = Vec::new();
        let err = generator.generate(&mut out).unwrap_err();

        assert!(out.is_empty());
        assert!(err.chain().any(|cause| cause.to_string().contains("Pending")));
    }

    #[test]
    fn test_data_routes_and_types_order() {
        let mut graph = TypeGraph::new();
        let string = graph.scalar(Kind::String);

        let names: Vec<String> = Generator::new(graph)
            .data("zeta", DataEntry::new(json!("z"), string))
            .route("alpha", Route::new("GET", "/alpha", string))
            .types([("Beta", string), ("Alpha", string)])
            .items()
            .unwrap()
            .iter()
            .map(|item| item.name().to_string())
            .collect();

        assert_eq!(names, vec!["Alpha", "Beta", "alpha", "zeta"]);
    }

    #[test]
    fn test_write_to_skips_identical_output() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("web").join("src").join("generated.ts");
        let generator = Generator::default().namespace("Api");

        assert_eq!(generator.write_to(&path).unwrap(), WriteResult::Written);
        assert_eq!(generator.write_to(&path).unwrap(), WriteResult::Unchanged);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            generator.render().unwrap()
        );

        let changed = generator.namespace("Other");
        assert_eq!(changed.write_to(&path).unwrap(), WriteResult::Written);
    }
}
