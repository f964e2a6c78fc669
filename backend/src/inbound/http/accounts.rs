//! Signup, login, logout and dashboard handlers.
//!
//! ```text
//! POST /api/v1/{role}/signup    {"username":"house","email":"...","password":"...","confirmPassword":"..."}
//! POST /api/v1/{role}/login     {"username":"house","password":"..."}
//! POST /api/v1/logout
//! GET  /api/v1/{role}/dashboard
//! ```
//!
//! `{role}` is `patient` or `doctor`; any other segment is a 404.

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::RegisteredAccount;
use crate::domain::{
    ApiResult, Dashboard, Error, LoginCredentials, LoginValidationError, RegistrationForm,
    RegistrationRequest, Role,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const LANDING_PATH: &str = "/";
const LOGOUT_MESSAGE: &str = "You have been logged out successfully";

/// Signup body. Every field defaults to empty so missing values surface as
/// field errors rather than body parse failures.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    /// Postal code.
    pub pincode: Option<String>,
    /// Stored image reference, e.g. `profiles/patients/ada.png`.
    pub profile_picture: Option<String>,
}

impl SignupRequest {
    fn as_form(&self) -> RegistrationForm<'_> {
        RegistrationForm {
            username: &self.username,
            email: &self.email,
            password: &self.password,
            confirm_password: &self.confirm_password,
            first_name: self.first_name.as_deref(),
            last_name: self.last_name.as_deref(),
            line1: self.line1.as_deref(),
            city: self.city.as_deref(),
            state: self.state.as_deref(),
            pincode: self.pincode.as_deref(),
            profile_picture: self.profile_picture.as_deref(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityBody {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBody {
    pub id: Uuid,
    pub role: Role,
    pub address_id: Option<Uuid>,
    pub profile_picture: Option<String>,
}

/// `201` body for a completed signup.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub message: String,
    pub identity: IdentityBody,
    pub profile: ProfileBody,
    /// Login page for the registered role.
    pub redirect: String,
}

impl SignupResponse {
    fn new(account: &RegisteredAccount) -> Self {
        let RegisteredAccount {
            identity, profile, ..
        } = account;
        let role = profile.role();
        Self {
            message: format!("{} account created successfully!", role.title()),
            identity: IdentityBody {
                id: *identity.id().as_uuid(),
                username: identity.username().to_string(),
                email: identity.email().to_string(),
                first_name: identity.name().first().to_owned(),
                last_name: identity.name().last().to_owned(),
            },
            profile: ProfileBody {
                id: *profile.id().as_uuid(),
                role,
                address_id: profile.address_id().map(|id| *id.as_uuid()),
                profile_picture: profile.image().map(|image| image.as_ref().to_owned()),
            },
            redirect: role.login_path().to_owned(),
        }
    }
}

/// Login body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub identity_id: Uuid,
    pub role: Role,
    /// Dashboard page for the role.
    pub redirect: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub message: String,
    pub redirect: String,
}

fn role_from_path(raw: &str) -> Result<Role, Error> {
    raw.parse()
        .map_err(|_| Error::not_found(format!("no such portal: {raw}")))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match err {
        LoginValidationError::EmptyUsername => ("username", "empty_username"),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Register a new identity with a profile for `role`.
///
/// No session is created; clients follow `Location` to the login page.
#[utoipa::path(
    post,
    path = "/api/v1/{role}/signup",
    params(("role" = Role, Path, description = "patient or doctor")),
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse,
            headers(("Location" = String, description = "Login page for the role"))),
        (status = 400, description = "Invalid field or passwords differ", body = ErrorSchema),
        (status = 404, description = "Unknown role", body = ErrorSchema),
        (status = 409, description = "Username or email taken", body = ErrorSchema),
        (status = 500, description = "Account could not be created", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "signup",
    security([])
)]
#[post("/{role}/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    role: web::Path<String>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let role = role_from_path(&role)?;
    let request = RegistrationRequest::from(payload.as_form());
    let account = state.registration.register(role, request).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, role.login_path()))
        .json(SignupResponse::new(&account)))
}

/// Authenticate as `role` and start a session.
#[utoipa::path(
    post,
    path = "/api/v1/{role}/login",
    params(("role" = Role, Path, description = "patient or doctor")),
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session established", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Blank username or password", body = ErrorSchema),
        (status = 401, description = "Invalid username or password", body = ErrorSchema),
        (status = 403, description = "No profile for this role", body = ErrorSchema),
        (status = 404, description = "Unknown role", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/{role}/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    role: web::Path<String>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let role = role_from_path(&role)?;
    let credentials = LoginCredentials::try_from_parts(&payload.username, &payload.password)
        .map_err(map_login_validation_error)?;
    let principal = state.login.authenticate(role, &credentials).await?;
    session.establish(principal)?;
    Ok(web::Json(LoginResponse {
        identity_id: *principal.identity_id().as_uuid(),
        role,
        redirect: role.dashboard_path().to_owned(),
    }))
}

/// End the session. Succeeds whether or not one exists.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 200, description = "Logged out", body = LogoutResponse)),
    tags = ["accounts"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> web::Json<LogoutResponse> {
    session.terminate();
    web::Json(LogoutResponse {
        message: LOGOUT_MESSAGE.to_owned(),
        redirect: LANDING_PATH.to_owned(),
    })
}

/// Dashboard for the signed-in principal, tagged by `role`.
#[utoipa::path(
    get,
    path = "/api/v1/{role}/dashboard",
    params(("role" = Role, Path, description = "patient or doctor")),
    responses(
        (status = 200, description = "Patient or doctor dashboard, tagged by `role`"),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No profile for this role", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "dashboard",
    security(("SessionCookie" = []))
)]
#[get("/{role}/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
    role: web::Path<String>,
) -> ApiResult<web::Json<Dashboard>> {
    let role = role_from_path(&role)?;
    let principal = session.require_principal()?;
    let board = state.dashboards.dashboard(principal, role).await?;
    Ok(web::Json(board))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
