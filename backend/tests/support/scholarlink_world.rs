//! Shared world and request helpers for the ScholarLink behaviour suites.
//!
//! Each request builds a fresh Actix test service over the world's
//! [`TestHarness`], so state lives in the in-memory store rather than in the
//! app instance.

use std::future::Future;

use actix_web::{App, test as actix_test, web};
use scholarlink::Trace;
use scholarlink::domain::TRACE_ID_HEADER;
use scholarlink::inbound::http::configure;
use scholarlink::inbound::http::error::{
    json_error_handler, path_error_handler, query_error_handler,
};
use rstest_bdd_macros::then;
use scholarlink::domain::Scholarship;
use scholarlink::test_support::TestHarness;
use serde_json::Value;

/// Captured response from the last request.
#[derive(Debug)]
pub struct Snapshot {
    pub status: u16,
    pub body: Value,
    pub trace_id: Option<String>,
}

/// Scenario state shared between steps.
pub struct ApiWorld {
    pub harness: TestHarness,
    pub scholarship: Option<Scholarship>,
    pub application_id: Option<String>,
    pub last: Option<Snapshot>,
}

impl ApiWorld {
    pub fn new() -> Self {
        Self {
            harness: TestHarness::new(),
            scholarship: None,
            application_id: None,
            last: None,
        }
    }

    /// Dispatch `request` and record the response as the latest snapshot.
    pub fn send(&mut self, request: actix_test::TestRequest) {
        self.last = Some(run_async(dispatch(&self.harness, request)));
    }

    pub fn scholarship(&self) -> &Scholarship {
        self.scholarship.as_ref().expect("a scholarship was seeded")
    }

    pub fn last(&self) -> &Snapshot {
        self.last.as_ref().expect("a request was sent")
    }

    /// The `data` array of the latest listing response.
    pub fn last_items(&self) -> &[Value] {
        self.last().body["data"]
            .as_array()
            .map(Vec::as_slice)
            .expect("data array")
    }
}

fn run_async<T>(future: impl Future<Output = T>) -> T {
    actix_web::rt::System::new().block_on(future)
}

async fn dispatch(harness: &TestHarness, request: actix_test::TestRequest) -> Snapshot {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(harness.state()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .wrap(Trace)
            .configure(configure),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status().as_u16();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);
    let bytes = actix_test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    Snapshot {
        status,
        body,
        trace_id,
    }
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &mut ApiWorld, status: u16) {
    assert_eq!(world.last().status, status, "body: {}", world.last().body);
}
