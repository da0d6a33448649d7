//! Search, facet filtering and pagination over loaded record lists.
//!
//! Everything here is pure: callers load a collection with the service
//! `list` functions and derive the visible page from a [`ViewQuery`].

use std::collections::BTreeMap;

use entity::{
    candidate, employee, employee_type, interview, job_announcement, job_offer, job_requisition,
    leave_request, leave_type, probation_record, role, user_account,
};

use crate::error::{HrError, HrResult};
use crate::fsm::Label;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 200;

/// A record that can be narrowed by free text and named facets.
pub trait Searchable {
    /// Facet names accepted in [`ViewQuery::filters`].
    const FACETS: &'static [&'static str];

    /// Fields the search term is matched against.
    fn search_fields(&self) -> Vec<&str>;

    /// Current value of `facet`, rendered as it would be filtered on.
    fn facet(&self, facet: &str) -> Option<String>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: Option<String>,
    pub filters: BTreeMap<String, String>,
    pub page: u64,
    pub page_size: u64,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            search: None,
            filters: BTreeMap::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ViewQuery {
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn filter(mut self, facet: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(facet.into(), value.into());
        self
    }

    pub fn page(mut self, page: u64, page_size: u64) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    fn term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }

    fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .map(|(facet, value)| (facet.as_str(), value.trim()))
            .filter(|(_, value)| !value.is_empty())
    }

    /// Reject filters on facets the record type does not have.
    pub fn check_facets<T: Searchable>(&self) -> HrResult<()> {
        for (facet, _) in self.active_filters() {
            if !T::FACETS.contains(&facet) {
                return Err(HrError::validation(
                    "filters",
                    format!("unknown filter `{facet}`"),
                ));
            }
        }
        Ok(())
    }

    pub fn matches<T: Searchable>(&self, record: &T) -> bool {
        if let Some(term) = self.term() {
            let hit = record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }
        self.active_filters().all(|(facet, value)| match record.facet(facet) {
            // Stored labels are snake_case, API enum names upper case.
            Some(actual) if facet == "status" => actual.eq_ignore_ascii_case(value),
            Some(actual) => actual == value,
            None => false,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Records matching the search term and every non-empty filter, in order.
pub fn apply<T: Searchable>(records: Vec<T>, query: &ViewQuery) -> Vec<T> {
    records
        .into_iter()
        .filter(|record| query.matches(record))
        .collect()
}

/// Slice out a 1-based page. `page_size` is clamped to `1..=200`; a page
/// past the end is empty but still reports the totals.
pub fn paginate<T>(items: Vec<T>, page: u64, page_size: u64) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
    let total_items = items.len() as u64;
    let total_pages = total_items.div_ceil(page_size);
    let skip = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
    let take = usize::try_from(page_size).unwrap_or(usize::MAX);
    Page {
        items: items.into_iter().skip(skip).take(take).collect(),
        page,
        page_size,
        total_items,
        total_pages,
    }
}

pub fn view<T: Searchable>(records: Vec<T>, query: &ViewQuery) -> HrResult<Page<T>> {
    query.check_facets::<T>()?;
    Ok(paginate(apply(records, query), query.page, query.page_size))
}

fn some<S: ToString>(value: S) -> Option<String> {
    Some(value.to_string())
}

impl Searchable for employee::Model {
    const FACETS: &'static [&'static str] = &["department", "employee_type_id", "status"];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.employee_number.as_str(),
        ];
        fields.extend(self.email.as_deref());
        fields.extend(self.position.as_deref());
        fields
    }

    fn facet(&self, facet: &str) -> Option<String> {
        match facet {
            "department" => self.department.clone(),
            "employee_type_id" => self.employee_type_id.map(|id| id.to_string()),
            "status" => some(self.status.label()),
            _ => None,
        }
    }
}

impl Searchable for employee_type::Model {
    const FACETS: &'static [&'static str] = &[];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }

    fn facet(&self, _: &str) -> Option<String> {
        None
    }
}

impl Searchable for role::Model {
    const FACETS: &'static [&'static str] = &[];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }

    fn facet(&self, _: &str) -> Option<String> {
        None
    }
}

impl Searchable for user_account::Model {
    const FACETS: &'static [&'static str] = &["role_id", "status"];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.username.as_str(), self.full_name.as_str()];
        fields.extend(self.email.as_deref());
        fields
    }

    fn facet(&self, facet: &str) -> Option<String> {
        match facet {
            "role_id" => some(self.role_id),
            "status" => some(self.status.label()),
            _ => None,
        }
    }
}

impl Searchable for leave_type::Model {
    const FACETS: &'static [&'static str] = &[];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }

    fn facet(&self, _: &str) -> Option<String> {
        None
    }
}

impl Searchable for leave_request::Model {
    const FACETS: &'static [&'static str] = &["employee_id", "leave_type_id", "status"];

    fn search_fields(&self) -> Vec<&str> {
        [
            self.reason.as_deref(),
            self.approved_by.as_deref(),
            self.rejected_by.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn facet(&self, facet: &str) -> Option<String> {
        match facet {
            "employee_id" => some(self.employee_id),
            "leave_type_id" => some(self.leave_type_id),
            "status" => some(self.status.label()),
            _ => None,
        }
    }
}

impl Searchable for probation_record::Model {
    const FACETS: &'static [&'static str] = &["employee_id", "status"];

    fn search_fields(&self) -> Vec<&str> {
        self.notes.as_deref().into_iter().collect()
    }

    fn facet(&self, facet: &str) -> Option<String> {
        match facet {
            "employee_id" => some(self.employee_id),
            "status" => some(self.status.label()),
            _ => None,
        }
    }
}

/// A record listed with its employee is also found by the employee's name or
/// number.
impl<T: Searchable> Searchable for (T, Option<employee::Model>) {
    const FACETS: &'static [&'static str] = T::FACETS;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = self.0.search_fields();
        if let Some(employee) = &self.1 {
            fields.extend([
                employee.first_name.as_str(),
                employee.last_name.as_str(),
                employee.employee_number.as_str(),
            ]);
        }
        fields
    }

    fn facet(&self, facet: &str) -> Option<String> {
        self.0.facet(facet)
    }
}

impl Searchable for job_requisition::Model {
    const FACETS: &'static [&'static str] = &["department", "status"];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.department.as_deref());
        fields
    }

    fn facet(&self, facet: &str) -> Option<String> {
        match facet {
            "department" => self.department.clone(),
            "status" => some(self.status.label()),
            _ => None,
        }
    }
}

impl Searchable for job_announcement::Model {
    const FACETS: &'static [&'static str] = &["requisition_id", "status"];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }

    fn facet(&self, facet: &str) -> Option<String> {
        match facet {
            "requisition_id" => some(self.requisition_id),
            "status" => some(self.status.label()),
            _ => None,
        }
    }
}

impl Searchable for candidate::Model {
    const FACETS: &'static [&'static str] = &["announcement_id", "status"];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.full_name.as_str(), self.email.as_str()];
        fields.extend(self.phone.as_deref());
        fields
    }

    fn facet(&self, facet: &str) -> Option<String> {
        match facet {
            "announcement_id" => some(self.announcement_id),
            "status" => some(self.status.label()),
            _ => None,
        }
    }
}

impl Searchable for interview::Model {
    const FACETS: &'static [&'static str] = &["candidate_id", "status"];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.interviewer.as_str()];
        fields.extend(self.feedback.as_deref());
        fields
    }

    fn facet(&self, facet: &str) -> Option<String> {
        match facet {
            "candidate_id" => some(self.candidate_id),
            "status" => some(self.status.label()),
            _ => None,
        }
    }
}

impl Searchable for job_offer::Model {
    const FACETS: &'static [&'static str] = &["candidate_id", "currency", "status"];

    fn search_fields(&self) -> Vec<&str> {
        vec![self.currency.as_str()]
    }

    fn facet(&self, facet: &str) -> Option<String> {
        match facet {
            "candidate_id" => some(self.candidate_id),
            "currency" => some(&self.currency),
            "status" => some(self.status.label()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
        team: &'static str,
        status: &'static str,
    }

    impl Searchable for Row {
        const FACETS: &'static [&'static str] = &["team", "status"];

        fn search_fields(&self) -> Vec<&str> {
            vec![self.name]
        }

        fn facet(&self, facet: &str) -> Option<String> {
            match facet {
                "team" => some(self.team),
                "status" => some(self.status),
                _ => None,
            }
        }
    }

    fn rows() -> Vec<Row> {
        let teams = ["ops", "eng", "eng", "hr"];
        let statuses = ["active", "inactive"];
        let names = ["Ada", "adam", "Grace", "Linus", "Margaret", "Dennis", "Adele"];
        names
            .iter()
            .enumerate()
            .map(|(i, &name)| Row {
                name,
                team: teams[i % teams.len()],
                status: statuses[i % statuses.len()],
            })
            .collect()
    }

    #[test]
    fn result_is_exactly_the_matching_subset() {
        let queries = [
            ViewQuery::default(),
            ViewQuery::default().search(" AD "),
            ViewQuery::default().filter("team", "eng"),
            ViewQuery::default().search("a").filter("status", "active"),
            ViewQuery::default().search("zzz"),
            ViewQuery::default().filter("team", "").filter("status", "inactive"),
        ];
        for query in queries {
            let kept = apply(rows(), &query);
            let term = query.term();
            let expected: Vec<Row> = rows()
                .into_iter()
                .filter(|row| {
                    term.as_ref()
                        .is_none_or(|t| row.name.to_lowercase().contains(t))
                })
                .filter(|row| {
                    query.filters.iter().all(|(facet, value)| {
                        value.is_empty() || row.facet(facet).as_deref() == Some(value.as_str())
                    })
                })
                .collect();
            assert_eq!(kept, expected, "query {query:?}");
        }
    }

    #[test]
    fn search_is_case_insensitive() {
        let names: Vec<_> = apply(rows(), &ViewQuery::default().search("ADA"))
            .into_iter()
            .map(|row| row.name)
            .collect();
        assert_eq!(names, ["Ada", "adam"]);
    }

    #[test]
    fn pages_are_one_based_and_clamped() {
        let page = paginate((1..=25).collect::<Vec<_>>(), 3, 10);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 25);

        let beyond = paginate((1..=25).collect::<Vec<_>>(), 9, 10);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_items, 25);

        let clamped = paginate((1..=5).collect::<Vec<_>>(), 0, 0);
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.page_size, 1);
        assert_eq!(clamped.items, vec![1]);

        let capped = paginate((1..=500).collect::<Vec<_>>(), 1, 10_000);
        assert_eq!(capped.page_size, MAX_PAGE_SIZE);
        assert_eq!(capped.items.len(), 200);
    }

    #[test]
    fn empty_collection_has_no_pages() {
        let page = paginate(Vec::<u8>::new(), 1, 10);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn unknown_facets_are_rejected() {
        let err = view(rows(), &ViewQuery::default().filter("salary", "1"))
            .unwrap_err();
        assert!(matches!(err, HrError::Validation { field: "filters", .. }));
        assert!(view(rows(), &ViewQuery::default().filter("salary", " ")).is_ok());
    }

    #[test]
    fn status_facet_uses_stored_labels() {
        let ts = crate::support::now();
        let record = job_requisition::Model {
            id: 1,
            title: "SRE".into(),
            department: Some("Platform".into()),
            positions: 1,
            justification: None,
            status: job_requisition::Status::InProgress,
            created_at: ts,
            updated_at: ts,
        };
        let query = ViewQuery::default()
            .search("sre")
            .filter("status", "in_progress");
        assert!(query.matches(&record));
        assert!(!ViewQuery::default().filter("department", "platform").matches(&record));
    }

    #[test]
    fn status_facet_accepts_api_enum_names() {
        let ts = crate::support::now();
        let record = job_requisition::Model {
            id: 2,
            title: "DBA".into(),
            department: None,
            positions: 1,
            justification: None,
            status: job_requisition::Status::InProgress,
            created_at: ts,
            updated_at: ts,
        };
        assert!(ViewQuery::default().filter("status", "IN_PROGRESS").matches(&record));
        assert!(ViewQuery::default().filter("status", "In_Progress").matches(&record));
        assert!(!ViewQuery::default().filter("status", "OPEN").matches(&record));

        let kept = apply(rows(), &ViewQuery::default().filter("status", "ACTIVE"));
        assert!(!kept.is_empty());
        assert!(kept.iter().all(|row| row.status == "active"));
    }
}
