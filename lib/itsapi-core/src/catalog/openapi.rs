use std::collections::BTreeSet;

use http::Method;
use indexmap::IndexMap;
use utoipa::openapi::path::{Operation as OpenApiOperation, Parameter, ParameterBuilder, ParameterIn};
use utoipa::openapi::request_body::RequestBody;
use utoipa::openapi::schema::{Array, Object, Type};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityRequirement, SecurityScheme};
use utoipa::openapi::{
    Components, Content, Info, OpenApi, PathItem, Paths, Required, Response, Tag,
};

use super::{Catalog, Operation, ParamSpec};
use crate::client::ParamStyle;
use crate::validation::BodyRule;

const SECURITY_SCHEME: &str = "bearerAuth";

impl Catalog {
    /// Documents the catalogue as an OpenAPI specification.
    ///
    /// Each operation becomes a path item keyed by its exact path, with its
    /// query parameters (required flags taken from the rule table, lists as
    /// exploded `form` arrays) and a tag per [`Domain`](super::Domain). Every operation
    /// requires the `bearerAuth` scheme.
    pub fn to_openapi(&self) -> OpenApi {
        let mut items = IndexMap::<String, PathItem>::new();
        for operation in self.operations() {
            let item = items.entry(operation.path().to_string()).or_default();
            let documented = Some(document(operation));
            match *operation.method() {
                Method::GET => item.get = documented,
                Method::POST => item.post = documented,
                Method::PUT => item.put = documented,
                Method::PATCH => item.patch = documented,
                Method::DELETE => item.delete = documented,
                _ => {}
            }
        }

        let mut paths = Paths::builder();
        for (path, item) in items {
            paths = paths.path(path, item);
        }

        let components = Components::builder()
            .security_scheme(
                SECURITY_SCHEME,
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
            .build();

        OpenApi::builder()
            .info(Info::new("ITS API", env!("CARGO_PKG_VERSION")))
            .paths(paths.build())
            .components(Some(components))
            .tags(Some(self.tags()))
            .security(Some(vec![SecurityRequirement::new(
                SECURITY_SCHEME,
                Vec::<String>::new(),
            )]))
            .build()
    }

    fn tags(&self) -> Vec<Tag> {
        let domains = self.operations().map(Operation::domain).collect::<BTreeSet<_>>();
        domains
            .into_iter()
            .map(|domain| {
                let mut tag = Tag::new(domain.tag());
                tag.description = Some(domain.description().to_string());
                tag
            })
            .collect()
    }
}

fn document(operation: &Operation) -> OpenApiOperation {
    let parameters = operation
        .params()
        .iter()
        .map(to_parameter)
        .collect::<Vec<_>>();

    let builder = OpenApiOperation::builder()
        .operation_id(Some(operation.name()))
        .tags(Some(vec![operation.domain().tag().to_string()]))
        .parameters((!parameters.is_empty()).then_some(parameters))
        .response("200", Response::new("Successful response"))
        .response("422", Response::new("Business validation failure"));

    let builder = match operation.rule().body {
        BodyRule::Optional => builder,
        BodyRule::Required | BodyRule::NonEmptyArray => {
            let request_body = RequestBody::builder()
                .content("application/json", Content::builder().build())
                .required(Some(Required::True))
                .build();
            builder.request_body(Some(request_body))
        }
    };

    builder.build()
}

fn to_parameter(param: &ParamSpec) -> Parameter {
    let required = if param.required {
        Required::True
    } else {
        Required::False
    };
    let builder = ParameterBuilder::new()
        .name(param.name)
        .parameter_in(ParameterIn::Query)
        .required(required);

    if param.list {
        builder
            .schema(Some(Array::new(Object::with_type(Type::String))))
            .style(Some(ParamStyle::Form.into()))
            .explode(Some(true))
            .build()
    } else {
        builder
            .schema(Some(Object::with_type(Type::String)))
            .build()
    }
}
