//! Admin dashboard aggregates.
//!
//! ```text
//! GET /admin/analytics   Authorization: Bearer <id token>
//! ```

use actix_web::http::header::AUTHORIZATION;
use actix_web::{HttpRequest, HttpResponse, get, web};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::ports::{AnalyticsSnapshot, LabelCount};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// A label and how many applications carry it.
#[derive(Debug, Serialize, ToSchema)]
pub struct LabelCountBody {
    #[schema(example = "pending")]
    pub label: String,
    #[schema(example = 4)]
    pub count: u64,
}

impl From<LabelCount> for LabelCountBody {
    fn from(entry: LabelCount) -> Self {
        Self {
            label: entry.label,
            count: entry.count,
        }
    }
}

/// Collection totals with application breakdowns.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsBody {
    pub total_users: u64,
    pub total_scholarships: u64,
    pub total_applications: u64,
    pub total_reviews: u64,
    /// Application fees plus service charges over paid applications.
    pub collected_fees: f64,
    pub applications_by_status: Vec<LabelCountBody>,
    pub applications_by_category: Vec<LabelCountBody>,
}

impl From<AnalyticsSnapshot> for AnalyticsBody {
    fn from(snapshot: AnalyticsSnapshot) -> Self {
        Self {
            total_users: snapshot.total_users,
            total_scholarships: snapshot.total_scholarships,
            total_applications: snapshot.total_applications,
            total_reviews: snapshot.total_reviews,
            collected_fees: snapshot.collected_fees,
            applications_by_status: snapshot
                .applications_by_status
                .into_iter()
                .map(LabelCountBody::from)
                .collect(),
            applications_by_category: snapshot
                .applications_by_category
                .into_iter()
                .map(LabelCountBody::from)
                .collect(),
        }
    }
}

/// Dashboard totals. Requires a verified bearer credential.
#[utoipa::path(
    get,
    path = "/admin/analytics",
    responses(
        (status = 200, description = "Aggregates", body = AnalyticsBody),
        (status = 401, description = "Missing or rejected credential", body = ErrorSchema),
        (status = 503, description = "Identity provider or store unavailable", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "getAnalytics",
    security(("BearerToken" = []))
)]
#[get("/admin/analytics")]
pub async fn get_analytics(
    state: web::Data<HttpState>,
    request: HttpRequest,
) -> ApiResult<HttpResponse> {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let identity = state.identity.authenticate(authorization).await?;
    debug!(subject = %identity.subject, "analytics requested");
    let snapshot = state.analytics.snapshot().await?;
    Ok(envelope::ok(AnalyticsBody::from(snapshot)))
}
