//! Lowering of a parsed manifest into a type graph and generation input.

use std::collections::HashMap;

use miette::SourceSpan;
use tracing::debug;
use tsmirror_core::{
    CoreError, DataEntry, GenerationInput, Route, Shape, StructField, StructTag, TypeGraph, TypeId,
};

use super::{Declaration, Manifest, validate::ParseContext};
use crate::{
    Result,
    expr::{TypeExpr, WellKnown, builtin_kind, well_known},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Visiting,
    Done,
}

impl Manifest {
    /// Build the type graph and generation input described by the manifest.
    ///
    /// Declarations may refer to each other in any order. A declaration whose
    /// underlying type is another declaration copies that declaration's shape,
    /// so chains of underlying types must end in something other than
    /// themselves.
    pub fn lower(&self) -> Result<(TypeGraph, GenerationInput)> {
        let mut lowerer = Lowerer::new(self);

        for name in self.declarations.keys() {
            lowerer.define(name)?;
        }
        lowerer
            .graph
            .validate()
            .map_err(|err| lowerer.core_error(err, None))?;

        let input = lowerer.input()?;
        debug!(
            declarations = self.declarations.len(),
            types = input.types.len(),
            routes = input.routes.len(),
            data = input.data.len(),
            "lowered manifest"
        );
        Ok((lowerer.graph, input))
    }
}

struct Lowerer<'m> {
    manifest: &'m Manifest,
    ctx: ParseContext<'m>,
    graph: TypeGraph,
    declared: HashMap<&'m str, TypeId>,
    states: HashMap<&'m str, State>,
}

impl<'m> Lowerer<'m> {
    fn new(manifest: &'m Manifest) -> Self {
        let mut graph = TypeGraph::new();
        let declared = manifest
            .declarations
            .keys()
            .map(|name| (name.as_str(), graph.declare(name.as_str())))
            .collect();

        Self {
            manifest,
            ctx: ParseContext::new(manifest.source().clone()),
            graph,
            declared,
            states: HashMap::new(),
        }
    }

    fn define(&mut self, name: &'m str) -> Result<()> {
        match self.states.get(name) {
            Some(State::Done) => return Ok(()),
            Some(State::Visiting) => {
                return Err(self
                    .ctx
                    .source_context()
                    .recursive_declaration_error(name, self.ctx.find_key_span(name)));
            }
            None => {}
        }

        let manifest = self.manifest;
        let (Some(declaration), Some(&id)) =
            (manifest.declarations.get(name), self.declared.get(name))
        else {
            return Ok(());
        };

        self.states.insert(name, State::Visiting);
        let ctx = self.ctx.push("declarations").push(name);
        let shape = self.shape_of(name, declaration, &ctx)?;

        self.graph
            .define(id, shape)
            .map_err(|err| self.core_error(err, ctx.find_key_span(name)))?;
        if declaration.stringer {
            self.graph
                .set_renders_to_string(id, true)
                .map_err(|err| self.core_error(err, ctx.find_key_span(name)))?;
        }

        self.states.insert(name, State::Done);
        debug!(declaration = name, ty = %self.graph.display(id), "defined declaration");
        Ok(())
    }

    fn shape_of(
        &mut self,
        name: &'m str,
        declaration: &'m Declaration,
        ctx: &ParseContext<'m>,
    ) -> Result<Shape> {
        if let Some(underlying) = &declaration.underlying {
            let manifest = self.manifest;
            let expr = ctx.parse_type(underlying)?;
            if let Some((target, _)) = expr
                .as_name()
                .and_then(|n| manifest.declarations.get_key_value(n))
            {
                self.define(target)?;
            }
            let context = format!("underlying type of '{}'", name);
            let id = self.resolve(&expr, underlying, ctx, &context)?;
            return Ok(self.graph.get(id).shape().clone());
        }

        let mut fields = Vec::new();
        for field in declaration.fields.iter().flatten() {
            let member = field.member_name().ok_or_else(|| {
                ctx.validation_error(
                    format!("field of type '{}' needs a name", field.ty),
                    ctx.find_value_span(&field.ty),
                )
            })?;
            let expr = ctx.parse_type(&field.ty)?;
            let context = format!("field '{}' of '{}'", member, name);
            let ty = self.resolve(&expr, &field.ty, ctx, &context)?;

            let exported = field.is_exported();
            let mut lowered = if field.embedded {
                StructField::embedded(member, ty)
            } else {
                StructField::new(member, ty)
            }
            .exported(exported);
            if let Some(json) = &field.json {
                lowered = lowered.json(json);
            } else if let Some(tag) = &field.tag {
                lowered = lowered.tag(StructTag::new(tag.as_str()));
            }
            fields.push(lowered);
        }
        Ok(Shape::Struct(fields))
    }

    /// Resolve a parsed expression; `raw` is its manifest spelling, used to
    /// locate errors.
    fn resolve(
        &mut self,
        expr: &TypeExpr,
        raw: &str,
        ctx: &ParseContext<'m>,
        context: &str,
    ) -> Result<TypeId> {
        let id = match expr {
            TypeExpr::Named(name) => {
                if let Some(kind) = builtin_kind(name) {
                    self.graph.scalar(kind)
                } else if let Some(known) = well_known(name) {
                    match known {
                        WellKnown::Any => self.graph.any(),
                        WellKnown::Timestamp => self.graph.timestamp(),
                        WellKnown::Duration => self.graph.duration(),
                    }
                } else if let Some(&id) = self.declared.get(name.as_str()) {
                    id
                } else {
                    let span = ctx
                        .find_value_span(raw)
                        .or_else(|| ctx.find_key_span(raw))
                        .map(|span| match raw.find(name.as_str()) {
                            Some(pos) => SourceSpan::from((span.offset() + pos, name.len())),
                            None => span,
                        });
                    return Err(ctx
                        .source_context()
                        .unknown_type_error(name, context, span));
                }
            }
            TypeExpr::Pointer(elem) => {
                let elem = self.resolve(elem, raw, ctx, context)?;
                self.graph.pointer(elem)
            }
            TypeExpr::Slice(elem) => {
                let elem = self.resolve(elem, raw, ctx, context)?;
                self.graph.slice(elem)
            }
            TypeExpr::Array { len, elem } => {
                let elem = self.resolve(elem, raw, ctx, context)?;
                self.graph.array(elem, *len)
            }
            TypeExpr::Map { key, value } => {
                let key = self.resolve(key, raw, ctx, context)?;
                let value = self.resolve(value, raw, ctx, context)?;
                self.graph.map(key, value)
            }
        };
        Ok(id)
    }

    fn resolve_raw(&mut self, raw: &str, ctx: &ParseContext<'m>, context: &str) -> Result<TypeId> {
        let expr = ctx.parse_type(raw)?;
        self.resolve(&expr, raw, ctx, context)
    }

    fn input(&mut self) -> Result<GenerationInput> {
        let manifest = self.manifest;
        let mut input = GenerationInput {
            namespace: manifest.output.namespace.clone(),
            ..GenerationInput::default()
        };

        let ctx = self.ctx.push("types");
        for (name, raw) in &manifest.types {
            let id = self.resolve_raw(raw, &ctx, &format!("type '{}'", name))?;
            input.types.insert(name.clone(), id);
        }

        let ctx = self.ctx.push("routes");
        for (name, config) in &manifest.routes {
            let route_ctx = ctx.push(name);
            let context = format!("route '{}'", name);
            let response = self.resolve_raw(&config.response, &route_ctx, &context)?;

            let mut route = Route::new(
                config.method.to_ascii_uppercase(),
                config.path.clone(),
                response,
            );
            if let Some(request) = &config.request {
                route = route.request_body(self.resolve_raw(request, &route_ctx, &context)?);
            }
            for (param, raw) in &config.query {
                route = route.query(param.clone(), self.resolve_raw(raw, &route_ctx, &context)?);
            }
            input.routes.insert(name.clone(), route);
        }

        let ctx = self.ctx.push("data");
        for (name, config) in &manifest.data {
            let ty = self.resolve_raw(&config.ty, &ctx, &format!("data '{}'", name))?;
            let value = match (&config.value, &config.json) {
                (Some(value), _) => toml_to_json(value).map_err(|message| {
                    ctx.validation_error(
                        format!("data '{}': {}", name, message),
                        ctx.find_key_span(name),
                    )
                })?,
                (None, Some(json)) => serde_json::from_str(json).map_err(|err| {
                    ctx.validation_error(
                        format!("data '{}' holds invalid JSON: {}", name, err),
                        ctx.find_key_span(name),
                    )
                })?,
                (None, None) => {
                    return Err(ctx.validation_error(
                        format!("data '{}' has no value", name),
                        ctx.find_key_span(name),
                    ));
                }
            };
            input.data.insert(name.clone(), DataEntry::new(value, ty));
        }

        let ctx = self.ctx.push("overrides");
        for (raw, ts) in &manifest.overrides {
            match builtin_kind(raw.trim()) {
                Some(kind) => {
                    input.kind_overrides.insert(kind, ts.clone());
                }
                None => {
                    let id = self.resolve_raw(raw, &ctx, "override")?;
                    input.type_overrides.insert(id, ts.clone());
                }
            }
        }

        Ok(input)
    }

    fn core_error(&self, err: CoreError, span: Option<SourceSpan>) -> Box<crate::Error> {
        self.ctx.validation_error(err.to_string(), span)
    }
}

/// Convert a TOML value to JSON. Datetimes become their RFC 3339 strings.
fn toml_to_json(value: &toml::Value) -> std::result::Result<serde_json::Value, String> {
    use serde_json::Value as Json;

    let json = match value {
        toml::Value::String(s) => Json::String(s.clone()),
        toml::Value::Integer(i) => Json::from(*i),
        toml::Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(Json::Number)
            .ok_or_else(|| format!("{} cannot be represented in JSON", f))?,
        toml::Value::Boolean(b) => Json::Bool(*b),
        toml::Value::Datetime(dt) => Json::String(dt.to_string()),
        toml::Value::Array(items) => Json::Array(
            items
                .iter()
                .map(toml_to_json)
                .collect::<std::result::Result<_, _>>()?,
        ),
        toml::Value::Table(table) => Json::Object(
            table
                .iter()
                .map(|(k, v)| Ok((k.clone(), toml_to_json(v)?)))
                .collect::<std::result::Result<_, String>>()?,
        ),
    };
    Ok(json)
}
