//! User registration and admin user handlers.
//!
//! ```text
//! POST /users {"email":"ada@example.com","name":"Ada","photoURL":"…"}
//! GET  /users?search=&page=&limit=
//! GET  /users/{email}
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ListingParams, RegistrationInput, Role, User, UserRegistration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{self, MessageEnvelope, PageMetaBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Informational message returned when the email is already registered.
pub const ALREADY_REGISTERED: &str = "Already have an account using this email";

/// Registration body. A `role` field, if sent, is ignored.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[serde(alias = "photoURL")]
    pub photo_url: Option<String>,
}

impl From<RegistrationRequest> for RegistrationInput {
    fn from(body: RegistrationRequest) -> Self {
        Self {
            email: body.email,
            name: body.name,
            photo_url: body.photo_url,
        }
    }
}

/// Admin user listing parameters. Values are coerced, never rejected.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserListingQuery {
    /// Case-insensitive substring of the name or email.
    pub search: Option<String>,
    #[param(example = "1")]
    pub page: Option<String>,
    #[param(example = "10")]
    pub limit: Option<String>,
}

impl From<UserListingQuery> for ListingParams {
    fn from(query: UserListingQuery) -> Self {
        Self {
            search: query.search,
            page: query.page,
            limit: query.limit,
            ..Self::default()
        }
    }
}

/// User as served to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    #[schema(value_type = String, example = "Student")]
    pub role: Role,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.into(),
            name: user.name,
            photo_url: user.photo_url,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Admin user listing as documented in OpenAPI.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UserPage {
    success: bool,
    data: Vec<UserBody>,
    meta: PageMetaBody,
}

/// Register an account, idempotently by email.
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegistrationRequest,
    responses(
        (status = 201, description = "Account created", body = UserBody),
        (status = 200, description = "Email already registered", body = MessageEnvelope),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegistrationRequest>,
) -> ApiResult<HttpResponse> {
    // A new account answers 201 with the user under `data`. A known email
    // answers 200 with a message and no `data`.
    Ok(
        match state.users.register(payload.into_inner().into()).await? {
            UserRegistration::Created(user) => envelope::created(UserBody::from(user)),
            UserRegistration::AlreadyRegistered => envelope::message(ALREADY_REGISTERED),
        },
    )
}

/// Admin listing, newest accounts first; searches name and email.
#[utoipa::path(
    get,
    path = "/users",
    params(UserListingQuery),
    responses(
        (status = 200, description = "Users", body = UserPage),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<UserListingQuery>,
) -> ApiResult<HttpResponse> {
    let params: ListingParams = query.into_inner().into();
    let listing = state.users.list(&params).await?;
    Ok(envelope::page(listing, UserBody::from))
}

/// Look up a user by email.
#[utoipa::path(
    get,
    path = "/users/{email}",
    params(("email" = String, Path, description = "Account email")),
    responses(
        (status = 200, description = "User", body = UserBody),
        (status = 400, description = "Malformed email", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{email}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = state.users.find(&path).await?;
    Ok(envelope::ok(UserBody::from(user)))
}
