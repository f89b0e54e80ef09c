//! Listing queries: filter, sort and page window for the scholarship and user
//! listings.
//!
//! Request parameters are untrusted strings. Everything here is a pure
//! transformation; repositories execute the resulting query and report the
//! total match count so [`pagination::Paginated`] can derive page metadata.

use std::cmp::Ordering;

use pagination::PageRequest;

use crate::domain::{FeeAmount, Scholarship, User};

/// Case-insensitive sentinel meaning "no filter" for category and country.
pub const SENTINEL_ALL: &str = "all";
/// Default page size for the public scholarship listing.
pub const PUBLIC_PAGE_SIZE: u64 = 9;
/// Default page size for admin listings.
pub const ADMIN_PAGE_SIZE: u64 = 10;
/// Number of scholarships returned by the top listing.
pub const TOP_SCHOLARSHIPS: u64 = 6;

/// Raw listing parameters as received from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// A trimmed, non-blank free-text search term.
///
/// Matching is a case-insensitive substring test. Characters that are
/// wildcards in SQL `LIKE` patterns are matched literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    folded: String,
}

impl SearchTerm {
    /// Build a term from optional input, returning `None` when blank.
    ///
    /// # Examples
    /// ```
    /// use scholarlink::domain::listing::SearchTerm;
    ///
    /// assert!(SearchTerm::parse(Some("   ")).is_none());
    /// let term = SearchTerm::parse(Some(" oxf ")).expect("term");
    /// assert!(term.matches("Oxford Merit Award"));
    /// ```
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            raw: trimmed.to_owned(),
            folded: trimmed.to_lowercase(),
        })
    }

    /// The trimmed term.
    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    /// Case-insensitive substring test.
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.folded)
    }

    /// `%term%` with `\`, `%` and `_` escaped, for `ILIKE ... ESCAPE '\'`.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.raw.len() + 2);
        pattern.push('%');
        for ch in self.raw.chars() {
            if matches!(ch, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}

/// Ordering applied to scholarship listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Ascending by application fee, then tuition fee.
    FeeLow,
    /// Descending by application fee, then tuition fee.
    FeeHigh,
    /// Newest first by post date.
    #[default]
    Recent,
    /// Ascending by tuition fee, then application fee. Used by the top
    /// listing; `sortBy` never selects it.
    TuitionLow,
}

impl SortMode {
    /// Parse a `sortBy` value. Absent or unrecognised values fall back to
    /// [`SortMode::Recent`].
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("fee-low") => Self::FeeLow,
            Some("fee-high") => Self::FeeHigh,
            _ => Self::Recent,
        }
    }

    /// Total order over scholarships; the identifier breaks every tie.
    pub fn compare(self, left: &Scholarship, right: &Scholarship) -> Ordering {
        let primary = match self {
            Self::FeeLow => fee_key(left)
                .partial_cmp(&fee_key(right))
                .unwrap_or(Ordering::Equal),
            Self::FeeHigh => fee_key(right)
                .partial_cmp(&fee_key(left))
                .unwrap_or(Ordering::Equal),
            Self::Recent => right.post_date.cmp(&left.post_date),
            Self::TuitionLow => tuition_key(left)
                .partial_cmp(&tuition_key(right))
                .unwrap_or(Ordering::Equal),
        };
        let tiebreak = match self {
            Self::FeeLow | Self::TuitionLow => left.id.as_uuid().cmp(right.id.as_uuid()),
            Self::FeeHigh | Self::Recent => right.id.as_uuid().cmp(left.id.as_uuid()),
        };
        primary.then(tiebreak)
    }
}

fn fee_key(scholarship: &Scholarship) -> (f64, f64) {
    (
        FeeAmount::or_zero(scholarship.application_fees).value(),
        FeeAmount::or_zero(scholarship.tuition_fees).value(),
    )
}

fn tuition_key(scholarship: &Scholarship) -> (f64, f64) {
    let (application, tuition) = fee_key(scholarship);
    (tuition, application)
}

/// Scholarship text columns a search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScholarshipSearchField {
    ScholarshipName,
    UniversityName,
    Degree,
}

impl ScholarshipSearchField {
    fn value(self, scholarship: &Scholarship) -> &str {
        match self {
            Self::ScholarshipName => scholarship.scholarship_name.as_str(),
            Self::UniversityName => scholarship.university_name.as_str(),
            Self::Degree => scholarship.degree.as_str(),
        }
    }
}

const PUBLIC_SEARCH_FIELDS: &[ScholarshipSearchField] = &[
    ScholarshipSearchField::ScholarshipName,
    ScholarshipSearchField::UniversityName,
    ScholarshipSearchField::Degree,
];

const ADMIN_SEARCH_FIELDS: &[ScholarshipSearchField] = &[
    ScholarshipSearchField::ScholarshipName,
    ScholarshipSearchField::UniversityName,
];

fn equality_filter(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(SENTINEL_ALL) {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Filter predicate for scholarship listings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScholarshipFilter {
    search: Option<SearchTerm>,
    search_fields: &'static [ScholarshipSearchField],
    category: Option<String>,
    country: Option<String>,
}

impl ScholarshipFilter {
    /// The search term, when present.
    pub fn search(&self) -> Option<&SearchTerm> {
        self.search.as_ref()
    }

    /// Columns ORed together by the search clause.
    pub fn search_fields(&self) -> &'static [ScholarshipSearchField] {
        self.search_fields
    }

    /// Exact-match scholarship category.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Exact-match university country.
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Evaluate the predicate in memory.
    pub fn matches(&self, scholarship: &Scholarship) -> bool {
        let search_ok = self.search.as_ref().is_none_or(|term| {
            self.search_fields
                .iter()
                .any(|field| term.matches(field.value(scholarship)))
        });
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|category| scholarship.scholarship_category == category);
        let country_ok = self
            .country
            .as_deref()
            .is_none_or(|country| scholarship.university_country == country);
        search_ok && category_ok && country_ok
    }
}

/// A complete scholarship listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScholarshipQuery {
    pub filter: ScholarshipFilter,
    pub sort: SortMode,
    pub page: PageRequest,
}

impl ScholarshipQuery {
    /// Public listing: searches name, university and degree; default page
    /// size 9.
    pub fn public(params: &ListingParams) -> Self {
        Self::build(params, PUBLIC_SEARCH_FIELDS, PUBLIC_PAGE_SIZE)
    }

    /// Admin listing: searches name and university; default page size 10.
    pub fn admin(params: &ListingParams) -> Self {
        Self::build(params, ADMIN_SEARCH_FIELDS, ADMIN_PAGE_SIZE)
    }

    /// The cheapest scholarships by tuition fee, then application fee.
    pub fn top() -> Self {
        Self {
            filter: ScholarshipFilter::default(),
            sort: SortMode::TuitionLow,
            page: PageRequest::from_query(None, None, TOP_SCHOLARSHIPS),
        }
    }

    fn build(
        params: &ListingParams,
        search_fields: &'static [ScholarshipSearchField],
        default_limit: u64,
    ) -> Self {
        Self {
            filter: ScholarshipFilter {
                search: SearchTerm::parse(params.search.as_deref()),
                search_fields,
                category: equality_filter(params.category.as_deref()),
                country: equality_filter(params.country.as_deref()),
            },
            sort: SortMode::parse(params.sort_by.as_deref()),
            page: PageRequest::from_query(
                params.page.as_deref(),
                params.limit.as_deref(),
                default_limit,
            ),
        }
    }
}

/// Admin user listing query. Users are ordered newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    pub search: Option<SearchTerm>,
    pub page: PageRequest,
}

impl UserQuery {
    /// Searches name and email; default page size 10.
    pub fn admin(params: &ListingParams) -> Self {
        Self {
            search: SearchTerm::parse(params.search.as_deref()),
            page: PageRequest::from_query(
                params.page.as_deref(),
                params.limit.as_deref(),
                ADMIN_PAGE_SIZE,
            ),
        }
    }

    /// Evaluate the search clause in memory.
    pub fn matches(&self, user: &User) -> bool {
        self.search.as_ref().is_none_or(|term| {
            user.name.as_deref().is_some_and(|name| term.matches(name))
                || term.matches(user.email.as_ref())
        })
    }

    /// Newest first, identifier as tiebreaker.
    pub fn compare(left: &User, right: &User) -> Ordering {
        right
            .created_at
            .cmp(&left.created_at)
            .then_with(|| right.id.as_uuid().cmp(left.id.as_uuid()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Email, NewUser, ScholarshipDraft};
    use chrono::{Duration, TimeZone, Utc};
    use rstest::{fixture, rstest};

    fn params(pairs: &[(&str, &str)]) -> ListingParams {
        let mut params = ListingParams::default();
        for (key, value) in pairs {
            let value = Some((*value).to_owned());
            match *key {
                "search" => params.search = value,
                "category" => params.category = value,
                "country" => params.country = value,
                "sortBy" => params.sort_by = value,
                "page" => params.page = value,
                "limit" => params.limit = value,
                other => panic!("unknown key {other}"),
            }
        }
        params
    }

    fn scholarship(
        name: &str,
        university: &str,
        application: Option<f64>,
        tuition: Option<f64>,
    ) -> Scholarship {
        ScholarshipDraft {
            scholarship_name: name.to_owned(),
            university_name: university.to_owned(),
            university_image: None,
            university_country: "United Kingdom".to_owned(),
            university_city: None,
            university_world_rank: None,
            subject_category: "Engineering".to_owned(),
            scholarship_category: "Full fund".to_owned(),
            degree: "Masters".to_owned(),
            tuition_fees: tuition.and_then(|v| FeeAmount::new(v).ok()),
            application_fees: application.and_then(|v| FeeAmount::new(v).ok()),
            service_charge: None,
            application_deadline: None,
            posted_by: None,
        }
        .publish(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .expect("valid date"),
        )
    }

    #[fixture]
    fn oxford() -> Scholarship {
        scholarship(
            "Oxford Merit Award",
            "University of Oxford",
            Some(40.0),
            Some(1000.0),
        )
    }

    #[rstest]
    #[case(&[], 1, 9)]
    #[case(&[("page", "2"), ("limit", "5")], 2, 5)]
    #[case(&[("page", "abc"), ("limit", "")], 1, 9)]
    #[case(&[("page", "0"), ("limit", "-4")], 1, 9)]
    #[case(&[("page", "-1"), ("limit", "500")], 1, 500)]
    fn public_page_window_falls_back_to_defaults(
        #[case] pairs: &[(&str, &str)],
        #[case] page: u64,
        #[case] limit: u64,
    ) {
        let query = ScholarshipQuery::public(&params(pairs));
        assert_eq!((query.page.page(), query.page.limit()), (page, limit));
    }

    #[rstest]
    fn admin_default_limit_is_ten() {
        assert_eq!(
            ScholarshipQuery::admin(&ListingParams::default()).page.limit(),
            10
        );
        assert_eq!(UserQuery::admin(&ListingParams::default()).page.limit(), 10);
    }

    #[rstest]
    #[case("oxf", true)]
    #[case("OXFORD", true)]
    #[case("masters", true)]
    #[case("cambridge", false)]
    fn public_search_covers_name_university_degree(
        oxford: Scholarship,
        #[case] term: &str,
        #[case] expected: bool,
    ) {
        let query = ScholarshipQuery::public(&params(&[("search", term)]));
        assert_eq!(query.filter.matches(&oxford), expected);
    }

    #[rstest]
    fn admin_search_ignores_degree(oxford: Scholarship) {
        let query = ScholarshipQuery::admin(&params(&[("search", "masters")]));
        assert!(!query.filter.matches(&oxford));
    }

    #[rstest]
    #[case("all")]
    #[case("ALL")]
    #[case("  ")]
    fn sentinel_and_blank_category_do_not_filter(oxford: Scholarship, #[case] category: &str) {
        let query = ScholarshipQuery::public(&params(&[("category", category)]));
        assert_eq!(query.filter.category(), None);
        assert!(query.filter.matches(&oxford));
    }

    #[rstest]
    fn category_and_country_are_exact_and_anded(oxford: Scholarship) {
        let matching = params(&[("category", "Full fund"), ("country", "United Kingdom")]);
        assert!(ScholarshipQuery::public(&matching).filter.matches(&oxford));

        let other_country = params(&[("category", "Full fund"), ("country", "United")]);
        assert!(!ScholarshipQuery::public(&other_country).filter.matches(&oxford));
    }

    #[rstest]
    fn like_pattern_escapes_wildcards() {
        let term = SearchTerm::parse(Some("50%_off\\")).expect("term");
        assert_eq!(term.like_pattern(), "%50\\%\\_off\\\\%");
        assert!(!term.matches("50 percent off"));
    }

    #[rstest]
    #[case(None, SortMode::Recent)]
    #[case(Some("fee-low"), SortMode::FeeLow)]
    #[case(Some("fee-high"), SortMode::FeeHigh)]
    #[case(Some("cheapest"), SortMode::Recent)]
    fn sort_mode_parses_known_values(#[case] raw: Option<&str>, #[case] expected: SortMode) {
        assert_eq!(SortMode::parse(raw), expected);
    }

    #[rstest]
    fn fee_high_orders_by_fee_then_tuition() {
        let cheap = scholarship("A", "U", Some(10.0), Some(100.0));
        let pricey_low_tuition = scholarship("B", "U", Some(50.0), Some(100.0));
        let pricey_high_tuition = scholarship("C", "U", Some(50.0), Some(900.0));
        let free = scholarship("D", "U", None, None);
        let mut items = vec![cheap, free, pricey_low_tuition, pricey_high_tuition];

        items.sort_by(|a, b| SortMode::FeeHigh.compare(a, b));

        let names: Vec<_> = items.iter().map(|s| s.scholarship_name.as_str()).collect();
        assert_eq!(names, ["C", "B", "A", "D"]);
    }

    #[rstest]
    fn recent_orders_newest_first() {
        let older = scholarship("Old", "U", None, None);
        let mut newer = scholarship("New", "U", None, None);
        newer.post_date = older.post_date + Duration::days(1);
        let mut items = vec![older, newer];

        items.sort_by(|a, b| SortMode::Recent.compare(a, b));

        assert_eq!(items[0].scholarship_name, "New");
    }

    #[rstest]
    fn top_query_is_six_cheapest() {
        let query = ScholarshipQuery::top();
        assert_eq!(query.sort, SortMode::TuitionLow);
        assert_eq!(query.page.limit(), TOP_SCHOLARSHIPS);
        assert_eq!(query.page.skip(), 0);
    }

    #[rstest]
    fn tuition_low_ranks_tuition_before_application_fee() {
        let cheap_tuition = scholarship("CheapTuition", "U", Some(100.0), Some(1000.0));
        let pricey_tuition = scholarship("PriceyTuition", "U", Some(0.0), Some(50000.0));
        let mut items = vec![pricey_tuition, cheap_tuition];

        items.sort_by(|a, b| SortMode::TuitionLow.compare(a, b));
        let by_tuition: Vec<_> = items.iter().map(|s| s.scholarship_name.as_str()).collect();
        assert_eq!(by_tuition, ["CheapTuition", "PriceyTuition"]);

        items.sort_by(|a, b| SortMode::FeeLow.compare(a, b));
        let by_fee: Vec<_> = items.iter().map(|s| s.scholarship_name.as_str()).collect();
        assert_eq!(by_fee, ["PriceyTuition", "CheapTuition"]);
    }

    #[rstest]
    fn tuition_low_breaks_tuition_ties_by_application_fee() {
        let dearer = scholarship("Dearer", "U", Some(30.0), Some(500.0));
        let cheaper = scholarship("Cheaper", "U", Some(10.0), Some(500.0));
        let mut items = vec![dearer, cheaper];

        items.sort_by(|a, b| SortMode::TuitionLow.compare(a, b));

        assert_eq!(items[0].scholarship_name, "Cheaper");
    }

    #[rstest]
    fn sort_by_cannot_select_tuition_ordering() {
        assert_eq!(SortMode::parse(Some("tuition-low")), SortMode::Recent);
    }

    #[rstest]
    fn user_search_matches_name_or_email() {
        let user = NewUser {
            email: Email::new("ada@example.com").expect("valid"),
            name: Some("Ada Lovelace".to_owned()),
            photo_url: None,
        }
        .into_user(Utc::now());

        assert!(UserQuery::admin(&params(&[("search", "love")])).matches(&user));
        assert!(UserQuery::admin(&params(&[("search", "EXAMPLE")])).matches(&user));
        assert!(!UserQuery::admin(&params(&[("search", "grace")])).matches(&user));
    }
}
