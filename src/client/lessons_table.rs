use crate::types::dto::admin::LessonWithDetails;

pub const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Case-insensitive substring filters; an empty filter matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonFilters {
    pub title: String,
    pub chapter: String,
    pub subject: String,
    pub level: String,
}

impl LessonFilters {
    pub fn matches(&self, lesson: &LessonWithDetails) -> bool {
        contains_ci(&lesson.title, &self.title)
            && contains_ci(&lesson.chapter.name, &self.chapter)
            && contains_ci(&lesson.chapter.subject.name, &self.subject)
            && contains_ci(&lesson.chapter.level.name, &self.level)
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Filterable, paginated view over a fetched lesson list
///
/// Pages are 1-based and everything is recomputed from the snapshot on
/// each call.
#[derive(Debug, Clone)]
pub struct LessonsTable {
    lessons: Vec<LessonWithDetails>,
    filters: LessonFilters,
    page: usize,
    page_size: usize,
}

impl LessonsTable {
    pub fn new(lessons: Vec<LessonWithDetails>) -> Self {
        Self {
            lessons,
            filters: LessonFilters::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Replace the snapshot, e.g. after a refetch; filters are kept
    pub fn set_lessons(&mut self, lessons: Vec<LessonWithDetails>) {
        self.lessons = lessons;
        self.clamp_page();
    }

    pub fn filters(&self) -> &LessonFilters {
        &self.filters
    }

    /// Change a filter; the view goes back to page 1
    pub fn set_filters(&mut self, filters: LessonFilters) {
        self.filters = filters;
        self.page = 1;
    }

    pub fn reset_filters(&mut self) {
        self.filters = LessonFilters::default();
        self.page = 1;
    }

    pub fn filtered(&self) -> Vec<&LessonWithDetails> {
        self.lessons.iter().filter(|l| self.filters.matches(l)).collect()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// At least 1, even when nothing matches
    pub fn total_pages(&self) -> usize {
        self.filtered().len().div_ceil(self.page_size).max(1)
    }

    pub fn current_page_items(&self) -> Vec<&LessonWithDetails> {
        self.filtered()
            .into_iter()
            .skip((self.page - 1) * self.page_size)
            .take(self.page_size)
            .collect()
    }

    /// Move to `page`, clamped to `1..=total_pages()`
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.clamp_page();
    }

    /// Sizes outside `PAGE_SIZES` are ignored; a valid change resets to page 1
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if !PAGE_SIZES.contains(&page_size) {
            return false;
        }
        self.page_size = page_size;
        self.page = 1;
        true
    }

    fn clamp_page(&mut self) {
        self.page = self.page.clamp(1, self.total_pages());
    }
}
