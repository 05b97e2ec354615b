//! Async fetch stubs for HTTP routes.

use crate::builder::{CodeBuilder, CodeFragment, Renderable};

/// A parameter of a route stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// `export const name = async (...) => { ... }` calling `fetch`.
///
/// Query parameters are sent URL-encoded in the query string; the request body,
/// when present, is the JSON encoding of the `payload` argument.
#[derive(Debug, Clone)]
pub struct RouteFn {
    name: String,
    method: String,
    path: String,
    params: Vec<Param>,
    payload: Option<String>,
    response: String,
}

impl RouteFn {
    pub fn new(
        name: impl Into<String>,
        method: impl Into<String>,
        path: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            method: method.into(),
            path: path.into(),
            params: Vec::new(),
            payload: None,
            response: response.into(),
        }
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = Param>) -> Self {
        self.params.extend(params);
        self
    }

    /// Type of the JSON request body.
    pub fn payload(mut self, ty: impl Into<String>) -> Self {
        self.payload = Some(ty.into());
        self
    }

    pub fn build(&self) -> String {
        let mut builder = CodeBuilder::default();
        builder.emit(self);
        builder.build()
    }

    fn signature(&self) -> String {
        let mut arguments: Vec<String> = self
            .params
            .iter()
            .map(|p| format!("{}: {}", p.name, p.ty))
            .collect();
        if let Some(payload) = &self.payload {
            arguments.push(format!("payload: {}", payload));
        }

        format!(
            "export const {} = async ({}) => {{",
            self.name,
            arguments.join(", ")
        )
    }

    fn query_fragments(&self) -> Vec<CodeFragment> {
        let params = self
            .params
            .iter()
            .map(|p| CodeFragment::Line(format!("{}: {},", p.name, p.name)))
            .collect();

        vec![
            CodeFragment::block("const params = {", params, Some("}".to_string())),
            CodeFragment::Blank,
            CodeFragment::block(
                "const queryString = Object.keys(params).map((key) => {",
                vec![CodeFragment::line(
                    "return encodeURIComponent(key) + \"=\" + encodeURIComponent(params[key])",
                )],
                Some("}).join(\"&\")".to_string()),
            ),
            CodeFragment::Blank,
        ]
    }
}

impl Renderable for RouteFn {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut body = Vec::new();

        let fetch = if self.params.is_empty() {
            format!("const response = await fetch(\"{}\", {{", self.path)
        } else {
            body.extend(self.query_fragments());
            format!(
                "const response = await fetch(`{}?${{queryString}}`, {{",
                self.path
            )
        };

        let mut options = vec![CodeFragment::Line(format!("method: \"{}\",", self.method))];
        if self.payload.is_some() {
            options.push(CodeFragment::line("body: JSON.stringify(payload),"));
        }
        body.push(CodeFragment::block(fetch, options, Some("})".to_string())));
        body.push(CodeFragment::Blank);
        body.push(CodeFragment::Line(format!(
            "return await response.json() as {}",
            self.response
        )));

        vec![CodeFragment::block(
            self.signature(),
            body,
            Some("}".to_string()),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_route() {
        let route = RouteFn::new("GetThing", "POST", "/_backend?method=GetThing", "TestUser")
            .payload("string");

        insta::assert_snapshot!(route.build(), @r#"
export const GetThing = async (payload: string) => {
	const response = await fetch("/_backend?method=GetThing", {
		method: "POST",
		body: JSON.stringify(payload),
	})

	return await response.json() as TestUser
}
"#);
    }

    #[test]
    fn test_query_route() {
        let route = RouteFn::new("userGet", "GET", "/api/user", "UserResponse")
            .param(Param::new("userID", "TestUserID"))
            .param(Param::new("expand", "boolean"));

        insta::assert_snapshot!(route.build(), @r#"
export const userGet = async (userID: TestUserID, expand: boolean) => {
	const params = {
		userID: userID,
		expand: expand,
	}

	const queryString = Object.keys(params).map((key) => {
		return encodeURIComponent(key) + "=" + encodeURIComponent(params[key])
	}).join("&")

	const response = await fetch(`/api/user?${queryString}`, {
		method: "GET",
	})

	return await response.json() as UserResponse
}
"#);
    }

    #[test]
    fn test_params_precede_payload() {
        let route = RouteFn::new("update", "PUT", "/api/item", "Item")
            .params([Param::new("id", "number")])
            .payload("Item");

        assert!(
            route
                .build()
                .starts_with("export const update = async (id: number, payload: Item) => {\n")
        );
    }
}
