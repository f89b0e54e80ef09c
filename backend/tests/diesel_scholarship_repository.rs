//! Integration tests for `DieselScholarshipRepository` listings against
//! embedded PostgreSQL.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use scholarlink::domain::ports::ScholarshipRepository;
use scholarlink::domain::{
    FeeAmount, ListingParams, Scholarship, ScholarshipDraft, ScholarshipQuery,
};
use scholarlink::outbound::persistence::{DbPool, DieselScholarshipRepository, PoolConfig};
use scholarlink::test_support::draft;
use tokio::runtime::Runtime;

mod support;

use support::cluster_skip::handle_cluster_setup_failure;
use support::embedded_postgres::provision_database;

struct TestContext {
    runtime: Runtime,
    repository: DieselScholarshipRepository,
    _database: TemporaryDatabase,
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let database = provision_database(&runtime)?;

    let config = PoolConfig::new(database.url().to_string()).with_max_size(2);
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        repository: DieselScholarshipRepository::new(pool),
        _database: database,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn posted_at(offset_minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp")
        + Duration::minutes(offset_minutes)
}

fn priced(name: &str, application: f64, tuition: f64, offset_minutes: i64) -> Scholarship {
    ScholarshipDraft {
        application_fees: FeeAmount::new(application).ok(),
        tuition_fees: FeeAmount::new(tuition).ok(),
        ..draft(name, "University of Oxford")
    }
    .publish(posted_at(offset_minutes))
}

fn names(items: &[Scholarship]) -> Vec<&str> {
    items
        .iter()
        .map(|scholarship| scholarship.scholarship_name.as_str())
        .collect()
}

#[rstest]
fn top_listing_ranks_tuition_before_application_fee(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: top listing skipped");
        return;
    };
    let repository = context.repository.clone();

    let page = context.runtime.block_on(async {
        for scholarship in [
            priced("PriceyTuition", 0.0, 50_000.0, 0),
            priced("CheapTuition", 100.0, 1_000.0, 1),
            priced("CheapTuitionLowFee", 10.0, 1_000.0, 2),
        ] {
            repository.insert(&scholarship).await.expect("insert");
        }
        repository
            .list(&ScholarshipQuery::top())
            .await
            .expect("top listing")
    });

    assert_eq!(names(&page.items), ["CheapTuitionLowFee", "CheapTuition", "PriceyTuition"]);
}

#[rstest]
fn search_and_page_window_report_totals(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: search page window skipped");
        return;
    };
    let repository = context.repository.clone();

    let page = context.runtime.block_on(async {
        for n in 0..12_u32 {
            let scholarship = ScholarshipDraft {
                application_fees: FeeAmount::new(10.0 * f64::from(n)).ok(),
                ..draft(&format!("MIT Award {n:02}"), "Massachusetts Institute")
            }
            .publish(posted_at(i64::from(n)));
            repository.insert(&scholarship).await.expect("insert");
        }
        repository
            .insert(&priced("Oxford Merit Award", 5.0, 100.0, 20))
            .await
            .expect("insert");
        repository
            .list(&ScholarshipQuery::public(&ListingParams {
                search: Some("mit".to_owned()),
                sort_by: Some("fee-low".to_owned()),
                page: Some("2".to_owned()),
                limit: Some("5".to_owned()),
                ..ListingParams::default()
            }))
            .await
            .expect("search listing")
    });

    assert_eq!(page.meta.total, 12);
    assert_eq!(page.meta.total_pages, 3);
    assert_eq!(
        names(&page.items),
        [
            "MIT Award 05",
            "MIT Award 06",
            "MIT Award 07",
            "MIT Award 08",
            "MIT Award 09",
        ]
    );
}
