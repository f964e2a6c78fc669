//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the account and health endpoints, the request and
//! response bodies, both dashboard payloads, and the error envelope mirrors
//! from [`crate::inbound::http::schemas`]. Swagger UI serves it in debug
//! builds.

use crate::domain::{DoctorDashboard, PatientDashboard};
use crate::inbound::http::accounts::{
    IdentityBody, LoginRequest, LoginResponse, LogoutResponse, ProfileBody, SignupRequest,
    SignupResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Session cookie issued by POST /api/v1/{role}/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Care portal API",
        description = "Patient and doctor signup, session login, and role dashboards."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::signup,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::dashboard,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        SignupRequest,
        SignupResponse,
        IdentityBody,
        ProfileBody,
        LoginRequest,
        LoginResponse,
        LogoutResponse,
        PatientDashboard,
        DoctorDashboard,
    )),
    tags(
        (name = "accounts", description = "Signup, login, logout and dashboards"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
