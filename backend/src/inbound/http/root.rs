//! Plain-text greeting at `/`, used by uptime checks.

use actix_web::{HttpResponse, get};

/// Greeting body.
pub const GREETING: &str = "Hello World!";

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Greeting", body = String, content_type = "text/plain")),
    tags = ["health"],
    operation_id = "greeting"
)]
#[get("/")]
pub async fn greeting() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(GREETING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test as actix_test};

    #[actix_web::test]
    async fn root_greets() {
        let app = actix_test::init_service(App::new().service(greeting)).await;
        let request = actix_test::TestRequest::get().uri("/").to_request();
        let body = actix_test::call_and_read_body(&app, request).await;
        assert_eq!(body.as_ref(), GREETING.as_bytes());
    }
}
