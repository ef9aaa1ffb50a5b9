//! OpenAPI documentation configuration.
//!
//! Registers the user write endpoints, the health checks and the request,
//! response and error envelope schemas. Served by Swagger UI in debug builds.

use crate::inbound::http::error::{ErrorBody, ErrorEnvelope};
use crate::inbound::http::users::{
    CreateUserRequest, CreateUserResponse, UpdateUserRequest, UpdateUserResponse,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tristore user API",
        description = "Create and rename users across a relational, key-value and document store."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CreateUserRequest,
        CreateUserResponse,
        UpdateUserRequest,
        UpdateUserResponse,
        ErrorEnvelope,
        ErrorBody
    )),
    tags(
        (name = "users", description = "User write operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Assert that an Object schema contains a field with the given name.
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
    fn user_endpoints_are_documented() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/createUser"));
        assert!(doc.paths.paths.contains_key("/updateUser"));
        assert!(doc.paths.paths.contains_key("/health/ready"));
    }

    #[test]
    fn request_schemas_use_wire_field_names() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;

        let create = schemas.get("CreateUserRequest").expect("create schema");
        assert_object_schema_has_field(create, "name");
        let created = schemas.get("CreateUserResponse").expect("created schema");
        assert_object_schema_has_field(created, "userId");
        let update = schemas.get("UpdateUserRequest").expect("update schema");
        assert_object_schema_has_field(update, "userId");
        assert_object_schema_has_field(update, "name");
    }

    #[test]
    fn error_envelope_nests_code_and_message() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;

        let envelope = schemas.get("ErrorEnvelope").expect("envelope schema");
        assert_object_schema_has_field(envelope, "error");
        let body = schemas.get("ErrorBody").expect("error body schema");
        assert_object_schema_has_field(body, "code");
        assert_object_schema_has_field(body, "message");
    }
}
