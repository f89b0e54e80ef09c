//! In-memory implementation of every repository port.
//!
//! Listing, ordering and windowing reuse the domain's in-memory predicates
//! so results match what the Diesel adapters produce for the same query.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::ports::{
    AnalyticsRepository, AnalyticsRepositoryError, AnalyticsSnapshot, ApplicationRepository,
    ApplicationRepositoryError, ApplicationScope, LabelCount, PendingRemoval, ReviewRepository,
    ReviewRepositoryError, ScholarshipRepository, ScholarshipRepositoryError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Application, ApplicationId, ApplicationReview, ApplicationUpsert, Email, PaymentStatus,
    ReconcileOutcome, Review, ReviewEdit, ReviewId, ReviewScope, Scholarship, ScholarshipId,
    ScholarshipPatch, ScholarshipQuery, User, UserQuery,
};

#[derive(Default)]
struct Tables {
    scholarships: Vec<Scholarship>,
    applications: Vec<Application>,
    reviews: Vec<Review>,
    users: Vec<User>,
}

/// Shared tables behind a mutex.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn put_scholarship(&self, scholarship: Scholarship) {
        self.tables().scholarships.push(scholarship);
    }

    pub fn put_user(&self, user: User) {
        self.tables().users.push(user);
    }

    pub fn put_application(&self, application: Application) {
        self.tables().applications.push(application);
    }

    pub fn put_review(&self, review: Review) {
        self.tables().reviews.push(review);
    }

    /// Every stored application, in insertion order.
    pub fn applications(&self) -> Vec<Application> {
        self.tables().applications.clone()
    }

    /// Every stored review, in insertion order.
    pub fn reviews(&self) -> Vec<Review> {
        self.tables().reviews.clone()
    }

    /// Every stored scholarship, in insertion order.
    pub fn scholarships(&self) -> Vec<Scholarship> {
        self.tables().scholarships.clone()
    }

    /// Every stored user, in insertion order.
    pub fn users(&self) -> Vec<User> {
        self.tables().users.clone()
    }
}

fn window<T>(matches: Vec<T>, request: PageRequest) -> Paginated<T> {
    let total = matches.len() as u64;
    let skip = usize::try_from(request.skip()).unwrap_or(usize::MAX);
    let take = usize::try_from(request.window_len(total)).unwrap_or(usize::MAX);
    let items = matches.into_iter().skip(skip).take(take).collect();
    Paginated::new(items, request, total)
}

fn label_counts<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<LabelCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_owned(),
            count,
        })
        .collect()
}

#[async_trait]
impl ScholarshipRepository for InMemoryStore {
    async fn list(
        &self,
        query: &ScholarshipQuery,
    ) -> Result<Paginated<Scholarship>, ScholarshipRepositoryError> {
        let mut matches: Vec<Scholarship> = self
            .tables()
            .scholarships
            .iter()
            .filter(|scholarship| query.filter.matches(scholarship))
            .cloned()
            .collect();
        matches.sort_by(|left, right| query.sort.compare(left, right));
        Ok(window(matches, query.page))
    }

    async fn find_by_id(
        &self,
        id: &ScholarshipId,
    ) -> Result<Option<Scholarship>, ScholarshipRepositoryError> {
        Ok(self
            .tables()
            .scholarships
            .iter()
            .find(|scholarship| scholarship.id == *id)
            .cloned())
    }

    async fn insert(&self, scholarship: &Scholarship) -> Result<(), ScholarshipRepositoryError> {
        self.put_scholarship(scholarship.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: &ScholarshipId,
        patch: &ScholarshipPatch,
    ) -> Result<Option<Scholarship>, ScholarshipRepositoryError> {
        let mut tables = self.tables();
        let Some(target) = tables.scholarships.iter_mut().find(|s| s.id == *id) else {
            return Ok(None);
        };
        patch.apply_to(target);
        Ok(Some(target.clone()))
    }

    async fn delete(&self, id: &ScholarshipId) -> Result<bool, ScholarshipRepositoryError> {
        let mut tables = self.tables();
        let before = tables.scholarships.len();
        tables.scholarships.retain(|scholarship| scholarship.id != *id);
        Ok(tables.scholarships.len() != before)
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryStore {
    async fn upsert(
        &self,
        upsert: &ApplicationUpsert,
    ) -> Result<ReconcileOutcome, ApplicationRepositoryError> {
        let mut tables = self.tables();
        if let Some(existing) = tables
            .applications
            .iter_mut()
            .find(|application| application.key == upsert.key)
        {
            upsert.clone().apply_to(existing);
            return Ok(ReconcileOutcome::Updated(existing.clone()));
        }
        let created = upsert.clone().into_new_application();
        tables.applications.push(created.clone());
        Ok(ReconcileOutcome::Created(created))
    }

    async fn find_by_id(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        Ok(self
            .tables()
            .applications
            .iter()
            .find(|application| application.id == *id)
            .cloned())
    }

    async fn list(
        &self,
        scope: &ApplicationScope,
    ) -> Result<Vec<Application>, ApplicationRepositoryError> {
        let mut listed: Vec<Application> = self
            .tables()
            .applications
            .iter()
            .filter(|application| match scope {
                ApplicationScope::All => true,
                ApplicationScope::Applicant(email) => application.key.user_email == *email,
            })
            .cloned()
            .collect();
        listed.sort_by(|left, right| {
            right
                .application_date
                .cmp(&left.application_date)
                .then_with(|| right.id.as_uuid().cmp(left.id.as_uuid()))
        });
        Ok(listed)
    }

    async fn review(
        &self,
        id: &ApplicationId,
        review: &ApplicationReview,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let mut tables = self.tables();
        let Some(target) = tables.applications.iter_mut().find(|a| a.id == *id) else {
            return Ok(None);
        };
        review.apply_to(target);
        Ok(Some(target.clone()))
    }

    async fn remove_if_pending(
        &self,
        id: &ApplicationId,
    ) -> Result<PendingRemoval, ApplicationRepositoryError> {
        let mut tables = self.tables();
        let Some(position) = tables.applications.iter().position(|a| a.id == *id) else {
            return Ok(PendingRemoval::Missing);
        };
        if !tables.applications[position].is_removable() {
            return Ok(PendingRemoval::NotPending);
        }
        tables.applications.remove(position);
        Ok(PendingRemoval::Removed)
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        self.put_review(review.clone());
        Ok(())
    }

    async fn list(&self, scope: &ReviewScope) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut listed: Vec<Review> = self
            .tables()
            .reviews
            .iter()
            .filter(|review| scope.includes(review))
            .cloned()
            .collect();
        listed.sort_by(|left, right| {
            right
                .review_date
                .cmp(&left.review_date)
                .then_with(|| right.id.as_uuid().cmp(left.id.as_uuid()))
        });
        Ok(listed)
    }

    async fn update(
        &self,
        id: &ReviewId,
        edit: &ReviewEdit,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut tables = self.tables();
        let Some(target) = tables.reviews.iter_mut().find(|review| review.id == *id) else {
            return Ok(None);
        };
        edit.apply_to(target);
        Ok(Some(target.clone()))
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewRepositoryError> {
        let mut tables = self.tables();
        let before = tables.reviews.len();
        tables.reviews.retain(|review| review.id != *id);
        Ok(tables.reviews.len() != before)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert_if_absent(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut tables = self.tables();
        if tables.users.iter().any(|existing| existing.email == user.email) {
            return Ok(false);
        }
        tables.users.push(user.clone());
        Ok(true)
    }

    async fn list(&self, query: &UserQuery) -> Result<Paginated<User>, UserPersistenceError> {
        let mut matches: Vec<User> = self
            .tables()
            .users
            .iter()
            .filter(|user| query.matches(user))
            .cloned()
            .collect();
        matches.sort_by(UserQuery::compare);
        Ok(window(matches, query.page))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|user| user.email == *email)
            .cloned())
    }
}

#[async_trait]
impl AnalyticsRepository for InMemoryStore {
    async fn snapshot(&self) -> Result<AnalyticsSnapshot, AnalyticsRepositoryError> {
        let tables = self.tables();
        let collected_fees = tables
            .applications
            .iter()
            .filter(|application| application.payment_status == PaymentStatus::Paid)
            .map(|application| {
                application.snapshot.application_fees.value()
                    + application.snapshot.service_charge.value()
            })
            .sum();
        Ok(AnalyticsSnapshot {
            total_users: tables.users.len() as u64,
            total_scholarships: tables.scholarships.len() as u64,
            total_applications: tables.applications.len() as u64,
            total_reviews: tables.reviews.len() as u64,
            collected_fees,
            applications_by_status: label_counts(
                tables
                    .applications
                    .iter()
                    .map(|application| application.application_status.as_str()),
            ),
            applications_by_category: label_counts(
                tables
                    .applications
                    .iter()
                    .map(|application| application.snapshot.scholarship_category.as_str()),
            ),
        })
    }
}
