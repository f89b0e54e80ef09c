//! Scholarship listing and admin CRUD handlers.
//!
//! ```text
//! GET    /scholarships?search=&category=&country=&sortBy=&page=&limit=
//! GET    /top-scholarships
//! GET    /scholarships/{id}
//! POST   /scholarships
//! PATCH  /scholarships/{id}
//! DELETE /scholarships/{id}
//! GET    /admin/scholarships?search=&category=&country=&sortBy=&page=&limit=
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{FeeAmount, ListingParams, Scholarship, ScholarshipInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{self, MessageEnvelope, PageMetaBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Optional listing parameters. Every value is coerced, never rejected.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListingQuery {
    /// Case-insensitive substring search.
    pub search: Option<String>,
    /// Exact scholarship category, or `all`.
    pub category: Option<String>,
    /// Exact university country, or `all`.
    pub country: Option<String>,
    /// `fee-low`, `fee-high` or `recent` (default).
    #[param(example = "fee-low")]
    pub sort_by: Option<String>,
    #[param(example = "1")]
    pub page: Option<String>,
    #[param(example = "9")]
    pub limit: Option<String>,
}

impl From<ListingQuery> for ListingParams {
    fn from(query: ListingQuery) -> Self {
        Self {
            search: query.search,
            category: query.category,
            country: query.country,
            sort_by: query.sort_by,
            page: query.page,
            limit: query.limit,
        }
    }
}

/// Scholarship create or patch body. Fee fields accept numbers or numeric
/// strings under either spelling.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipRequest {
    #[schema(example = "Oxford Merit Award")]
    pub scholarship_name: Option<String>,
    #[schema(example = "University of Oxford")]
    pub university_name: Option<String>,
    pub university_image: Option<String>,
    #[schema(example = "United Kingdom")]
    pub university_country: Option<String>,
    pub university_city: Option<String>,
    pub university_world_rank: Option<i32>,
    pub subject_category: Option<String>,
    #[schema(example = "Full fund")]
    pub scholarship_category: Option<String>,
    #[schema(example = "Masters")]
    pub degree: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub tuition_fees: Option<FeeAmount>,
    #[serde(alias = "applicationFee")]
    #[schema(value_type = Option<f64>, example = 50)]
    pub application_fees: Option<FeeAmount>,
    #[serde(alias = "serviceCharges")]
    #[schema(value_type = Option<f64>, example = 10)]
    pub service_charge: Option<FeeAmount>,
    #[schema(value_type = Option<String>, example = "2025-09-30")]
    pub application_deadline: Option<NaiveDate>,
    /// Email of the posting admin.
    pub posted_by: Option<String>,
}

impl From<ScholarshipRequest> for ScholarshipInput {
    fn from(body: ScholarshipRequest) -> Self {
        Self {
            scholarship_name: body.scholarship_name,
            university_name: body.university_name,
            university_image: body.university_image,
            university_country: body.university_country,
            university_city: body.university_city,
            university_world_rank: body.university_world_rank,
            subject_category: body.subject_category,
            scholarship_category: body.scholarship_category,
            degree: body.degree,
            tuition_fees: body.tuition_fees,
            application_fees: body.application_fees,
            service_charge: body.service_charge,
            application_deadline: body.application_deadline,
            posted_by: body.posted_by,
        }
    }
}

/// Scholarship as served to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipBody {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub scholarship_name: String,
    pub university_name: String,
    pub university_image: Option<String>,
    pub university_country: String,
    pub university_city: Option<String>,
    pub university_world_rank: Option<i32>,
    pub subject_category: String,
    pub scholarship_category: String,
    pub degree: String,
    pub tuition_fees: Option<f64>,
    pub application_fees: Option<f64>,
    pub service_charge: Option<f64>,
    #[schema(value_type = Option<String>)]
    pub application_deadline: Option<NaiveDate>,
    #[schema(value_type = String)]
    pub post_date: DateTime<Utc>,
    pub posted_by: Option<String>,
}

impl From<Scholarship> for ScholarshipBody {
    fn from(scholarship: Scholarship) -> Self {
        Self {
            id: scholarship.id.to_string(),
            scholarship_name: scholarship.scholarship_name,
            university_name: scholarship.university_name,
            university_image: scholarship.university_image,
            university_country: scholarship.university_country,
            university_city: scholarship.university_city,
            university_world_rank: scholarship.university_world_rank,
            subject_category: scholarship.subject_category,
            scholarship_category: scholarship.scholarship_category,
            degree: scholarship.degree,
            tuition_fees: scholarship.tuition_fees.map(FeeAmount::value),
            application_fees: scholarship.application_fees.map(FeeAmount::value),
            service_charge: scholarship.service_charge.map(FeeAmount::value),
            application_deadline: scholarship.application_deadline,
            post_date: scholarship.post_date,
            posted_by: scholarship.posted_by,
        }
    }
}

/// Listing page as documented in OpenAPI.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ScholarshipPage {
    success: bool,
    data: Vec<ScholarshipBody>,
    meta: PageMetaBody,
}

/// Browse published scholarships.
#[utoipa::path(
    get,
    path = "/scholarships",
    params(ListingQuery),
    responses(
        (status = 200, description = "Matching scholarships", body = ScholarshipPage),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["scholarships"],
    operation_id = "listScholarships"
)]
#[get("/scholarships")]
pub async fn list_scholarships(
    state: web::Data<HttpState>,
    query: web::Query<ListingQuery>,
) -> ApiResult<HttpResponse> {
    let listing = state
        .catalogue
        .browse(&query.into_inner().into())
        .await?;
    Ok(envelope::page(listing, ScholarshipBody::from))
}

/// The six cheapest scholarships by tuition fee, then application fee.
#[utoipa::path(
    get,
    path = "/top-scholarships",
    responses(
        (status = 200, description = "Cheapest scholarships", body = [ScholarshipBody]),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["scholarships"],
    operation_id = "topScholarships"
)]
#[get("/top-scholarships")]
pub async fn top_scholarships(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let top = state.catalogue.top().await?;
    Ok(envelope::ok(
        top.into_iter().map(ScholarshipBody::from).collect::<Vec<_>>(),
    ))
}

/// Fetch one scholarship.
#[utoipa::path(
    get,
    path = "/scholarships/{id}",
    params(("id" = String, Path, description = "Scholarship identifier")),
    responses(
        (status = 200, description = "Scholarship", body = ScholarshipBody),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown scholarship", body = ErrorSchema)
    ),
    tags = ["scholarships"],
    operation_id = "getScholarship"
)]
#[get("/scholarships/{id}")]
pub async fn get_scholarship(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let scholarship = state.catalogue.get(&path).await?;
    Ok(envelope::ok(ScholarshipBody::from(scholarship)))
}

/// Publish a scholarship.
#[utoipa::path(
    post,
    path = "/scholarships",
    request_body = ScholarshipRequest,
    responses(
        (status = 201, description = "Created", body = ScholarshipBody),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["scholarships"],
    operation_id = "createScholarship"
)]
#[post("/scholarships")]
pub async fn create_scholarship(
    state: web::Data<HttpState>,
    payload: web::Json<ScholarshipRequest>,
) -> ApiResult<HttpResponse> {
    let created = state.catalogue.create(payload.into_inner().into()).await?;
    Ok(envelope::created(ScholarshipBody::from(created)))
}

/// Apply a partial update.
#[utoipa::path(
    patch,
    path = "/scholarships/{id}",
    params(("id" = String, Path, description = "Scholarship identifier")),
    request_body = ScholarshipRequest,
    responses(
        (status = 200, description = "Updated", body = ScholarshipBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown scholarship", body = ErrorSchema)
    ),
    tags = ["scholarships"],
    operation_id = "updateScholarship"
)]
#[patch("/scholarships/{id}")]
pub async fn update_scholarship(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ScholarshipRequest>,
) -> ApiResult<HttpResponse> {
    let updated = state
        .catalogue
        .update(&path, payload.into_inner().into())
        .await?;
    Ok(envelope::ok(ScholarshipBody::from(updated)))
}

/// Remove a scholarship.
#[utoipa::path(
    delete,
    path = "/scholarships/{id}",
    params(("id" = String, Path, description = "Scholarship identifier")),
    responses(
        (status = 200, description = "Deleted", body = MessageEnvelope),
        (status = 404, description = "Unknown scholarship", body = ErrorSchema)
    ),
    tags = ["scholarships"],
    operation_id = "deleteScholarship"
)]
#[delete("/scholarships/{id}")]
pub async fn delete_scholarship(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.catalogue.delete(&path).await?;
    Ok(envelope::message("scholarship deleted"))
}

/// Admin listing: searches name and university only, ten per page.
#[utoipa::path(
    get,
    path = "/admin/scholarships",
    params(ListingQuery),
    responses(
        (status = 200, description = "Matching scholarships", body = ScholarshipPage),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listAdminScholarships"
)]
#[get("/admin/scholarships")]
pub async fn list_admin_scholarships(
    state: web::Data<HttpState>,
    query: web::Query<ListingQuery>,
) -> ApiResult<HttpResponse> {
    let listing = state
        .catalogue
        .browse_admin(&query.into_inner().into())
        .await?;
    Ok(envelope::page(listing, ScholarshipBody::from))
}
