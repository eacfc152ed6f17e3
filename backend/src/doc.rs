//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint, the request and response DTOs,
//! the error envelope wrappers and the bearer token security scheme. Swagger
//! UI serves it in debug builds and `openapi-dump` prints it for tooling.

use crate::inbound::http::auth::{
    AccessTokenResponse, LoginRequest, RefreshRequest, TokenPairResponse,
};
use crate::inbound::http::dto::{
    ActivityRequest, ActivityResponse, DeletedResponse, ExpenseRequest, ExpenseResponse,
    TagRequest, TagResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token issued by POST /auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Lifelog API",
        description = "Personal log of tags, activities and expenses behind a single password."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::refresh,
        crate::inbound::http::health::health_check,
        crate::inbound::http::health::ready,
        crate::inbound::http::tags::list_tags,
        crate::inbound::http::tags::create_tag,
        crate::inbound::http::tags::update_tag,
        crate::inbound::http::tags::delete_tag,
        crate::inbound::http::tags::tag_expenses,
        crate::inbound::http::tags::tag_activities,
        crate::inbound::http::activities::list_activities,
        crate::inbound::http::activities::get_activity,
        crate::inbound::http::activities::create_activity,
        crate::inbound::http::activities::update_activity,
        crate::inbound::http::activities::delete_activity,
        crate::inbound::http::activities::activity_expenses,
        crate::inbound::http::activities::clear_activity_expenses,
        crate::inbound::http::expenses::list_expenses,
        crate::inbound::http::expenses::get_expense,
        crate::inbound::http::expenses::create_expense,
        crate::inbound::http::expenses::update_expense,
        crate::inbound::http::expenses::delete_expense,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        TokenPairResponse,
        RefreshRequest,
        AccessTokenResponse,
        TagRequest,
        TagResponse,
        ActivityRequest,
        ActivityResponse,
        ExpenseRequest,
        ExpenseResponse,
        DeletedResponse,
    )),
    tags(
        (name = "auth", description = "Password login and token refresh"),
        (name = "tags", description = "Labels shared by activities and expenses"),
        (name = "activities", description = "Timed things that happened"),
        (name = "expenses", description = "Money spent, optionally tied to an activity"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerToken"));
    }

    #[rstest]
    #[case("/auth/login")]
    #[case("/tags/{id}")]
    #[case("/activities/{id}/expenses")]
    #[case("/expenses")]
    #[case("/health-check")]
    fn paths_are_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}
