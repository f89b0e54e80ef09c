//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. Filtering, ordering and paging decisions
//!   arrive already made in the domain query types.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are never exposed to the domain layer.
//! - **Constraint-backed invariants**: uniqueness of applications per
//!   scholarship and applicant, and of users per email, is enforced by the
//!   database and exploited through `ON CONFLICT`.
//!
//! # Example
//!
//! ```ignore
//! use scholarlink::outbound::persistence::{DbPool, PoolConfig, DieselUserRepository};
//!
//! let config = PoolConfig::new("postgres://localhost/scholarlink");
//! let pool = DbPool::new(config).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_analytics_repository;
mod diesel_application_repository;
mod diesel_error_mapping;
mod diesel_review_repository;
mod diesel_scholarship_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_analytics_repository::DieselAnalyticsRepository;
pub use diesel_application_repository::DieselApplicationRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_scholarship_repository::DieselScholarshipRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
