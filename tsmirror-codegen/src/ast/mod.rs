//! TypeScript declarations emitted into the generated namespace.
//!
//! Output follows one fixed format: tab indentation and no trailing
//! semicolons.

mod consts;
mod fns;
mod types;

pub use consts::Const;
pub use fns::{Param, RouteFn};
pub use types::{Field, ObjectType, TypeAlias};
use tsmirror_core::{EmissionItem, TypeDefinition};

use crate::builder::{CodeFragment, Renderable};

/// Any top-level declaration of the generated file.
#[derive(Debug, Clone)]
pub enum Declaration {
    Alias(TypeAlias),
    Object(ObjectType),
    Const(Const),
    Route(RouteFn),
}

impl Renderable for Declaration {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        match self {
            Self::Alias(alias) => alias.to_fragments(),
            Self::Object(object) => object.to_fragments(),
            Self::Const(constant) => constant.to_fragments(),
            Self::Route(route) => route.to_fragments(),
        }
    }
}

impl TryFrom<&EmissionItem> for Declaration {
    type Error = serde_json::Error;

    fn try_from(item: &EmissionItem) -> Result<Self, Self::Error> {
        let declaration = match item {
            EmissionItem::Type(TypeDefinition::Alias { name, ty }) => {
                Self::Alias(TypeAlias::new(name, ty))
            }
            EmissionItem::Type(TypeDefinition::Object { name, fields }) => {
                Self::Object(ObjectType::new(name).fields(fields.iter().map(Field::from)))
            }
            EmissionItem::Route(route) => {
                let params = route
                    .params
                    .iter()
                    .map(|p| Param::new(&p.name, &p.ts_type));
                let stub = RouteFn::new(&route.name, &route.method, &route.path, &route.response)
                    .params(params);
                Self::Route(match &route.request_body {
                    Some(body) => stub.payload(body),
                    None => stub,
                })
            }
            EmissionItem::Data(data) => {
                Self::Const(Const::json(&data.name, &data.ts_type, &data.value)?)
            }
        };
        Ok(declaration)
    }
}

#[cfg(test)]
mod tests {
    use tsmirror_core::{DataLiteral, RouteDefinition, RouteParam};

    use super::*;
    use crate::builder::CodeBuilder;

    fn render(item: &EmissionItem) -> String {
        let mut builder = CodeBuilder::default();
        builder.emit(&Declaration::try_from(item).unwrap());
        builder.build()
    }

    #[test]
    fn test_alias_item() {
        let item = EmissionItem::Type(TypeDefinition::Alias {
            name: "GroupMapA".into(),
            ty: "{ [key: string]: group } | null".into(),
        });
        assert_eq!(
            render(&item),
            "export type GroupMapA = { [key: string]: group } | null\n"
        );
    }

    #[test]
    fn test_route_item() {
        let item = EmissionItem::Route(RouteDefinition {
            name: "userCreate".into(),
            path: "/api/user/create".into(),
            method: "POST".into(),
            params: vec![],
            request_body: Some("SystemUser".into()),
            response: "UserResponse".into(),
        });
        let out = render(&item);
        assert!(out.starts_with("export const userCreate = async (payload: SystemUser) => {\n"));
        assert!(out.contains("\t\tbody: JSON.stringify(payload),\n"));

        let item = EmissionItem::Route(RouteDefinition {
            name: "userGet".into(),
            path: "/api/user".into(),
            method: "GET".into(),
            params: vec![RouteParam {
                name: "userID".into(),
                ts_type: "TestUserID".into(),
            }],
            request_body: None,
            response: "UserResponse".into(),
        });
        let out = render(&item);
        assert!(out.starts_with("export const userGet = async (userID: TestUserID) => {\n"));
        assert!(!out.contains("payload"));
    }

    #[test]
    fn test_data_item() {
        let item = EmissionItem::Data(DataLiteral {
            name: "limits".into(),
            ts_type: "{ [key: string]: number } | null".into(),
            value: serde_json::json!({ "max": 10 }),
        });
        assert_eq!(
            render(&item),
            "export const limits: { [key: string]: number } | null = {\n\t\"max\": 10\n}\n"
        );
    }
}
