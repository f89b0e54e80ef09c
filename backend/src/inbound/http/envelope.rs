//! Success envelopes shared by every JSON endpoint.
//!
//! ```text
//! { "success": true, "data": { ... } }
//! { "success": true, "data": [ ... ], "meta": { "total": 12, ... } }
//! { "success": true, "message": "scholarship deleted" }
//! ```

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use pagination::{PageMeta, Paginated};
use serde::Serialize;
use utoipa::ToSchema;

/// Single-record or collection payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct DataEnvelope<T> {
    pub success: bool,
    pub data: T,
}

/// Paged listing payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct PageEnvelope<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub meta: PageMetaBody,
}

/// Listing metadata as serialised to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMetaBody {
    #[schema(example = 12)]
    pub total: u64,
    #[schema(example = 2)]
    pub page: u64,
    #[schema(example = 5)]
    pub limit: u64,
    #[schema(example = 3)]
    pub total_pages: u64,
}

impl From<PageMeta> for PageMetaBody {
    fn from(meta: PageMeta) -> Self {
        Self {
            total: meta.total,
            page: meta.page,
            limit: meta.limit,
            total_pages: meta.total_pages,
        }
    }
}

/// Informational payload without data.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageEnvelope {
    pub success: bool,
    #[schema(example = "scholarship deleted")]
    pub message: String,
}

/// `200 OK` with `data`.
pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    with_status(StatusCode::OK, data)
}

/// `201 Created` with `data`.
pub fn created<T: Serialize>(data: T) -> HttpResponse {
    with_status(StatusCode::CREATED, data)
}

fn with_status<T: Serialize>(status: StatusCode, data: T) -> HttpResponse {
    HttpResponse::build(status).json(DataEnvelope {
        success: true,
        data,
    })
}

/// `200 OK` listing with page metadata, mapping each item to its body.
pub fn page<T, B>(listing: Paginated<T>, to_body: impl FnMut(T) -> B) -> HttpResponse
where
    B: Serialize,
{
    let Paginated { items, meta } = listing;
    HttpResponse::Ok().json(PageEnvelope {
        success: true,
        data: items.into_iter().map(to_body).collect(),
        meta: meta.into(),
    })
}

/// `200 OK` with a message.
pub fn message(text: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().json(MessageEnvelope {
        success: true,
        message: text.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use pagination::PageRequest;
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn body(response: HttpResponse) -> Value {
        let bytes = to_bytes(response.into_body()).await.expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[rstest]
    #[actix_web::test]
    async fn page_envelope_carries_camel_case_meta() {
        let request = PageRequest::from_query(Some("2"), Some("5"), 9);
        let listing = Paginated::new(vec![1, 2, 3, 4, 5], request, 12);
        let value = body(page(listing, |n| n * 10)).await;
        assert_eq!(
            value,
            json!({
                "success": true,
                "data": [10, 20, 30, 40, 50],
                "meta": { "total": 12, "page": 2, "limit": 5, "totalPages": 3 }
            })
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn created_uses_201() {
        let response = created(json!({ "id": 1 }));
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[rstest]
    #[actix_web::test]
    async fn message_envelope_has_no_data() {
        let value = body(message("scholarship deleted")).await;
        assert_eq!(value, json!({ "success": true, "message": "scholarship deleted" }));
    }
}
