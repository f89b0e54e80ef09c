//! Behavioural tests for idempotent registration and dashboard access.

mod support;

use actix_web::http::header::AUTHORIZATION;
use actix_web::test as actix_test;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use scholarlink::inbound::http::users::ALREADY_REGISTERED;
use scholarlink::test_support::VALID_TOKEN;
use serde_json::json;
use support::scholarlink_world::ApiWorld;

#[fixture]
fn world() -> ApiWorld {
    ApiWorld::new()
}

#[given("{email} is registered")]
fn is_registered(world: &mut ApiWorld, email: String) {
    world.harness.seed_user(&email, None);
}

#[when("{email} registers as {name}")]
fn registers_as(world: &mut ApiWorld, email: String, name: String) {
    world.send(
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(json!({ "email": email, "name": name })),
    );
}

#[when("the dashboard is requested without credentials")]
fn dashboard_without_credentials(world: &mut ApiWorld) {
    world.send(actix_test::TestRequest::get().uri("/admin/analytics"));
}

#[when("the dashboard is requested with a valid credential")]
fn dashboard_with_credential(world: &mut ApiWorld) {
    world.send(
        actix_test::TestRequest::get()
            .uri("/admin/analytics")
            .insert_header((AUTHORIZATION, format!("Bearer {VALID_TOKEN}"))),
    );
}

#[then("the response says the email is already registered")]
fn the_response_says_already_registered(world: &mut ApiWorld) {
    assert_eq!(
        world.last().body["message"].as_str(),
        Some(ALREADY_REGISTERED)
    );
}

#[then("exactly {count} user is stored")]
fn exactly_users_stored(world: &mut ApiWorld, count: usize) {
    assert_eq!(world.harness.store.users().len(), count);
}

#[then("the error code is {code}")]
fn the_error_code_is(world: &mut ApiWorld, code: String) {
    assert_eq!(world.last().body["code"].as_str(), Some(code.as_str()));
}

#[then("the error carries the response trace id")]
fn the_error_carries_the_trace_id(world: &mut ApiWorld) {
    let snapshot = world.last();
    assert!(snapshot.trace_id.is_some(), "trace-id header expected");
    assert_eq!(
        snapshot.body["traceId"].as_str(),
        snapshot.trace_id.as_deref()
    );
}

#[then("the dashboard reports {count} user")]
fn the_dashboard_reports_users(world: &mut ApiWorld, count: u64) {
    assert_eq!(world.last().body["data"]["totalUsers"].as_u64(), Some(count));
}

#[scenario(
    path = "tests/features/user_accounts.feature",
    name = "Registering the same email twice"
)]
fn registering_the_same_email_twice(world: ApiWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_accounts.feature",
    name = "Dashboard without a bearer credential"
)]
fn dashboard_without_a_bearer_credential(world: ApiWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_accounts.feature",
    name = "Dashboard with a verified credential"
)]
fn dashboard_with_a_verified_credential(world: ApiWorld) {
    drop(world);
}
