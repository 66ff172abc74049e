// Course listing with search/pagination, and lookup lists for the pickers

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::client::CourseService;
use crate::api::errors::{StudioError, StudioResult};
use crate::api::types::{CourseSummary, LookupItem, LookupKind};
use crate::curriculum::Confirm;

/// One page of rows, `page` is 1-based
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

/// Slice `rows` into a page. Page 0 is read as page 1; past the end is empty.
pub fn paginate<T: Clone>(rows: &[T], page: usize, page_size: usize) -> TablePage<T> {
    let page_size = page_size.max(1);
    let page = page.max(1);
    let total = rows.len();
    let items = rows
        .iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .cloned()
        .collect();

    TablePage {
        items,
        page,
        total_pages: total.div_ceil(page_size),
        total,
    }
}

fn name_matches(name: &str, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || name.to_lowercase().contains(&query.to_lowercase())
}

pub struct CourseTable {
    service: Arc<dyn CourseService>,
    confirm: Arc<dyn Confirm>,
    page_size: usize,
    courses: RwLock<Vec<CourseSummary>>,
}

impl CourseTable {
    pub fn new(service: Arc<dyn CourseService>, confirm: Arc<dyn Confirm>, page_size: usize) -> Self {
        Self {
            service,
            confirm,
            page_size,
            courses: RwLock::new(Vec::new()),
        }
    }

    pub async fn refresh(&self) -> StudioResult<usize> {
        let courses = self.service.list_courses().await?;
        let count = courses.len();
        *self.courses.write().await = courses;
        debug!(count, "Course list refreshed");
        Ok(count)
    }

    /// Case-insensitive name filter over the last fetched list
    pub async fn search(&self, query: &str) -> Vec<CourseSummary> {
        self.courses
            .read()
            .await
            .iter()
            .filter(|course| name_matches(course.name.as_deref().unwrap_or_default(), query))
            .cloned()
            .collect()
    }

    pub async fn page(&self, query: &str, page: usize) -> TablePage<CourseSummary> {
        paginate(&self.search(query).await, page, self.page_size)
    }

    /// Confirm, delete, then refetch the list. A failed refetch keeps the
    /// locally pruned list; the delete itself already succeeded.
    pub async fn delete(&self, course_id: &str) -> StudioResult<()> {
        let name = self
            .courses
            .read()
            .await
            .iter()
            .find(|course| course.id == course_id)
            .and_then(|course| course.name.clone())
            .unwrap_or_else(|| course_id.to_string());

        if !self.confirm.confirm(&format!("Delete course \"{name}\"?")).await {
            return Err(StudioError::DeleteCancelled);
        }

        self.service.delete_course(course_id).await?;
        info!(course.id = %course_id, "Course deleted");
        self.courses.write().await.retain(|course| course.id != course_id);

        if let Err(e) = self.refresh().await {
            warn!(course.id = %course_id, error = %e, "Refetch after delete failed, keeping local list");
        }
        Ok(())
    }
}

/// Reference lists (categories, levels, instructors, ...)
pub struct LookupCatalog {
    service: Arc<dyn CourseService>,
}

impl LookupCatalog {
    pub fn new(service: Arc<dyn CourseService>) -> Self {
        Self { service }
    }

    pub async fn items(&self, kind: LookupKind) -> StudioResult<Vec<LookupItem>> {
        self.service.lookup(kind).await
    }

    /// Items whose name contains `query`, ignoring case
    pub async fn search(&self, kind: LookupKind, query: &str) -> StudioResult<Vec<LookupItem>> {
        Ok(self
            .items(kind)
            .await?
            .into_iter()
            .filter(|item| name_matches(&item.name, query))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeCourseService;
    use crate::api::MockCourseService;
    use crate::curriculum::{AlwaysConfirm, NeverConfirm};
    use crate::forms::FieldMap;
    use crate::workflow::WorkflowStatus;

    fn summary(id: &str, name: &str) -> CourseSummary {
        CourseSummary {
            id: id.to_string(),
            name: Some(name.to_string()),
            status: Some(WorkflowStatus::Draft),
            extra: FieldMap::new(),
        }
    }

    #[test]
    fn test_pagination_bounds() {
        let rows: Vec<u32> = (1..=13).collect();

        let first = paginate(&rows, 1, 6);
        assert_eq!(first.items, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(first.total_pages, 3);

        let last = paginate(&rows, 3, 6);
        assert_eq!(last.items, vec![13]);

        assert!(paginate(&rows, 4, 6).items.is_empty());
        assert_eq!(paginate(&rows, 0, 6).page, 1);
        assert_eq!(paginate::<u32>(&[], 1, 6).total_pages, 0);
    }

    #[tokio::test]
    async fn test_search_ignores_case() {
        let mut service = MockCourseService::new();
        service.expect_list_courses().times(1).returning(|| {
            Ok(vec![
                summary("1", "Intro to Design"),
                summary("2", "Advanced Rust"),
                summary("3", "Design Systems"),
            ])
        });
        let table = CourseTable::new(Arc::new(service), Arc::new(AlwaysConfirm), 6);
        table.refresh().await.unwrap();

        let found: Vec<String> = table.search("DESIGN").await.into_iter().map(|c| c.id).collect();
        assert_eq!(found, vec!["1", "3"]);
        assert_eq!(table.page("", 1).await.total, 3);
    }

    #[tokio::test]
    async fn test_delete_refetches_and_respects_confirmation() {
        let service = Arc::new(FakeCourseService::new());
        service.seed_course("c1", "Intro", WorkflowStatus::Draft);
        service.seed_course("c2", "Rust", WorkflowStatus::Published);

        let declined = CourseTable::new(service.clone(), Arc::new(NeverConfirm), 6);
        declined.refresh().await.unwrap();
        assert!(matches!(declined.delete("c1").await, Err(StudioError::DeleteCancelled)));
        assert!(service.status_of("c1").is_some());

        let table = CourseTable::new(service.clone(), Arc::new(AlwaysConfirm), 6);
        table.refresh().await.unwrap();
        table.delete("c1").await.unwrap();
        let remaining: Vec<String> = table.search("").await.into_iter().map(|c| c.id).collect();
        assert_eq!(remaining, vec!["c2"]);
    }

    #[tokio::test]
    async fn test_delete_succeeds_when_refetch_fails() {
        let mut service = MockCourseService::new();
        let mut seq = mockall::Sequence::new();
        service
            .expect_list_courses()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![summary("c1", "Intro"), summary("c2", "Rust")]));
        service
            .expect_delete_course()
            .withf(|id| id == "c1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        service
            .expect_list_courses()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(StudioError::rejected("list down")));

        let table = CourseTable::new(Arc::new(service), Arc::new(AlwaysConfirm), 6);
        table.refresh().await.unwrap();

        assert!(table.delete("c1").await.is_ok());
        let remaining: Vec<String> = table.search("").await.into_iter().map(|c| c.id).collect();
        assert_eq!(remaining, vec!["c2"]);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_the_row() {
        let mut service = MockCourseService::new();
        service
            .expect_list_courses()
            .times(1)
            .returning(|| Ok(vec![summary("c1", "Intro")]));
        service
            .expect_delete_course()
            .times(1)
            .returning(|_| Err(StudioError::rejected("Course has enrolments")));

        let table = CourseTable::new(Arc::new(service), Arc::new(AlwaysConfirm), 6);
        table.refresh().await.unwrap();

        assert!(matches!(
            table.delete("c1").await,
            Err(StudioError::ServerRejection { .. })
        ));
        assert_eq!(table.search("").await.len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_search_filters_by_name() {
        let mut service = MockCourseService::new();
        service
            .expect_lookup()
            .withf(|kind| *kind == LookupKind::Instructors)
            .returning(|_| {
                Ok(vec![
                    LookupItem {
                        id: "i1".to_string(),
                        name: "Ada Lovelace".to_string(),
                    },
                    LookupItem {
                        id: "i2".to_string(),
                        name: "Grace Hopper".to_string(),
                    },
                ])
            });
        let catalog = LookupCatalog::new(Arc::new(service));

        let found = catalog.search(LookupKind::Instructors, "hop").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "i2");
    }
}
