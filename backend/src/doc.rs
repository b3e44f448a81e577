//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint, the schema wrappers from
//! [`crate::inbound::http::schemas`] and the bearer token security scheme.
//! Swagger UI serves it in debug builds and `openapi-dump` prints it.

use crate::inbound::http::schemas::{
    AccountPatchSchema, AuthSessionSchema, ErrorCodeSchema, ErrorSchema, InstitutionRequestSchema,
    InstitutionSchema, LoginRequestSchema, MessageSchema, RegisterRequestSchema,
    ReviewRequestSchema, ReviewSchema, UserSchema,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the `BearerAuth` scheme referenced by protected operations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token returned by POST /auth/register or POST /auth/login.",
                    ))
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
        title = "Institution reviews API",
        description = "Accounts, institutions and reviews with bearer token authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::profile,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::institutions::list_institutions,
        crate::inbound::http::institutions::create_institution,
        crate::inbound::http::institutions::get_institution,
        crate::inbound::http::institutions::update_institution,
        crate::inbound::http::institutions::delete_institution,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::reviews_for_institution,
        crate::inbound::http::reviews::reviews_by_user,
        crate::inbound::http::reviews::update_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserSchema,
        InstitutionSchema,
        ReviewSchema,
        AuthSessionSchema,
        MessageSchema,
        RegisterRequestSchema,
        LoginRequestSchema,
        AccountPatchSchema,
        InstitutionRequestSchema,
        ReviewRequestSchema,
    )),
    tags(
        (name = "auth", description = "Registration, login and the caller's profile"),
        (name = "users", description = "User records"),
        (name = "institutions", description = "Reviewable institutions"),
        (name = "reviews", description = "Reviews of institutions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

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

    #[rstest]
    #[case("crate.domain.Error", "traceId")]
    #[case("crate.domain.User", "createdAt")]
    #[case("crate.domain.Institution", "addedBy")]
    #[case("crate.domain.Review", "institution")]
    fn registered_schemas_use_wire_field_names(#[case] name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("schema registered");
        assert_object_schema_has_field(schema, field);
    }

    #[rstest]
    #[case("/auth/register")]
    #[case("/institutions/{id}")]
    #[case("/reviews/institution/{institution_id}")]
    #[case("/health/ready")]
    fn documents_every_route_family(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn registers_bearer_security_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerAuth"));
    }
}
