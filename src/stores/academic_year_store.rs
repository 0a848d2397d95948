use chrono::{Months, NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;

use crate::errors::internal::AcademicYearError;
use crate::errors::InternalError;
use crate::types::db::{
    academic_year, chapter, class, inspector_assignment, lesson, level, sg_assignment,
    teacher_enrollment,
};
use crate::types::dto::academic_year::CopyOptions;
use crate::types::internal::validate_year_name;

/// Number of rows duplicated into the new year, per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopySummary {
    pub levels: u64,
    pub teachers: u64,
    pub classes: u64,
    pub chapters: u64,
    pub lessons: u64,
    pub inspector_assignments: u64,
    pub sg_assignments: u64,
}

/// Result of creating a new academic year
#[derive(Debug, Clone)]
pub struct Rollover {
    pub year: academic_year::Model,
    /// Year that was active before, and the source of every copy
    pub previous: Option<String>,
    pub copied: CopySummary,
}

/// Old level id to new level id, filled while copying levels
type LevelMap = HashMap<i32, i32>;

fn remap(levels: &LevelMap, level_id: i32) -> i32 {
    levels.get(&level_id).copied().unwrap_or(level_id)
}

/// Moves a `YYYY-MM-DD` planned date one year ahead; unparseable values are kept
fn shift_planned_date(planned_date: &str) -> String {
    NaiveDate::parse_from_str(planned_date, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.checked_add_months(Months::new(12)))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| planned_date.to_string())
}

/// AcademicYearStore owns the academic_years table and the year rollover
#[derive(Debug)]
pub struct AcademicYearStore {
    db: DatabaseConnection,
}

impl AcademicYearStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All year names, ascending
    pub async fn list_names(&self) -> Result<Vec<String>, InternalError> {
        let years = academic_year::Entity::find()
            .order_by_asc(academic_year::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_academic_years", e))?;

        Ok(years.into_iter().map(|y| y.name).collect())
    }

    pub async fn active_year(&self) -> Result<Option<academic_year::Model>, InternalError> {
        Self::find_active(&self.db).await
    }

    /// Name of the active year, or NoActiveYear
    pub async fn require_active_name(&self) -> Result<String, InternalError> {
        self.active_year()
            .await?
            .map(|y| y.name)
            .ok_or_else(|| AcademicYearError::NoActiveYear.into())
    }

    async fn find_active(
        conn: &impl ConnectionTrait,
    ) -> Result<Option<academic_year::Model>, InternalError> {
        academic_year::Entity::find()
            .filter(academic_year::Column::IsActive.eq(true))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_active_academic_year", e))
    }

    /// Make sure at least one year exists, inserting `name` as active otherwise
    ///
    /// Returns true when a year was inserted.
    pub async fn ensure_initial_year(&self, name: &str) -> Result<bool, InternalError> {
        validate_year_name(name)?;

        let existing = academic_year::Entity::find()
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("check_academic_years", e))?;
        if existing.is_some() {
            return Ok(false);
        }

        academic_year::ActiveModel {
            name: Set(name.to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_academic_year", e))?;

        Ok(true)
    }

    /// Create a new academic year and make it the active one
    ///
    /// Runs in a single transaction: the previously active year is archived,
    /// the new year is inserted as active, and the categories selected in
    /// `options` are duplicated from the previous year into the new one.
    /// Nothing is copied when there was no active year.
    ///
    /// # Errors
    /// * `AcademicYearError::EmptyName` / `InvalidName` - name is not "YYYY-YYYY"
    /// * `AcademicYearError::Duplicate` - a year with this name already exists
    pub async fn create_year(
        &self,
        name: &str,
        options: &CopyOptions,
    ) -> Result<Rollover, InternalError> {
        let name = name.trim();
        validate_year_name(name)?;

        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;

        let duplicate = academic_year::Entity::find()
            .filter(academic_year::Column::Name.eq(name))
            .one(&txn)
            .await
            .map_err(|e| InternalError::database("find_academic_year_by_name", e))?;
        if duplicate.is_some() {
            return Err(AcademicYearError::Duplicate(name.to_string()).into());
        }

        let previous = Self::find_active(&txn).await?;

        academic_year::Entity::update_many()
            .col_expr(academic_year::Column::IsActive, Expr::value(false))
            .filter(academic_year::Column::IsActive.eq(true))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("archive_academic_years", e))?;

        let year = academic_year::ActiveModel {
            name: Set(name.to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| InternalError::database("insert_academic_year", e))?;

        let mut copied = CopySummary::default();
        if let Some(prev) = &previous {
            let from = prev.name.as_str();
            let mut levels = LevelMap::new();

            if options.levels {
                copied.levels = copy_levels(&txn, from, name, &mut levels).await?;
            }
            if options.teachers {
                copied.teachers = copy_enrollments(&txn, from, name).await?;
            }
            if options.classes {
                copied.classes = copy_classes(&txn, from, name, &levels).await?;
            }
            if options.lessons {
                let (chapters, lessons) = copy_lessons(&txn, from, name, &levels).await?;
                copied.chapters = chapters;
                copied.lessons = lessons;
            }
            if options.inspector_assignments {
                copied.inspector_assignments =
                    copy_inspector_assignments(&txn, from, name).await?;
            }
            if options.sg_assignments {
                copied.sg_assignments = copy_sg_assignments(&txn, from, name, &levels).await?;
            }
        }

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!(
            year = %year.name,
            previous = previous.as_ref().map(|p| p.name.as_str()).unwrap_or("none"),
            ?copied,
            "Academic year created"
        );

        Ok(Rollover {
            year,
            previous: previous.map(|p| p.name),
            copied,
        })
    }
}

async fn copy_levels(
    conn: &impl ConnectionTrait,
    from: &str,
    to: &str,
    levels: &mut LevelMap,
) -> Result<u64, InternalError> {
    let rows = level::Entity::find()
        .filter(level::Column::AcademicYear.eq(from))
        .order_by_asc(level::Column::Id)
        .all(conn)
        .await
        .map_err(|e| InternalError::database("list_levels_for_copy", e))?;

    let now = Utc::now().timestamp();
    for row in &rows {
        let inserted = level::ActiveModel {
            name: Set(row.name.clone()),
            code: Set(row.code.clone()),
            category: Set(row.category.clone()),
            academic_year: Set(to.to_string()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("copy_level", e))?;
        levels.insert(row.id, inserted.id);
    }

    Ok(rows.len() as u64)
}

async fn copy_enrollments(
    conn: &impl ConnectionTrait,
    from: &str,
    to: &str,
) -> Result<u64, InternalError> {
    let rows = teacher_enrollment::Entity::find()
        .filter(teacher_enrollment::Column::AcademicYear.eq(from))
        .all(conn)
        .await
        .map_err(|e| InternalError::database("list_enrollments_for_copy", e))?;

    for row in &rows {
        teacher_enrollment::ActiveModel {
            teacher_id: Set(row.teacher_id.clone()),
            academic_year: Set(to.to_string()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("copy_enrollment", e))?;
    }

    Ok(rows.len() as u64)
}

async fn copy_classes(
    conn: &impl ConnectionTrait,
    from: &str,
    to: &str,
    levels: &LevelMap,
) -> Result<u64, InternalError> {
    let rows = class::Entity::find()
        .filter(class::Column::AcademicYear.eq(from))
        .all(conn)
        .await
        .map_err(|e| InternalError::database("list_classes_for_copy", e))?;

    for row in &rows {
        class::ActiveModel {
            name: Set(row.name.clone()),
            level_id: Set(remap(levels, row.level_id)),
            academic_year: Set(to.to_string()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("copy_class", e))?;
    }

    Ok(rows.len() as u64)
}

/// Copies chapters and their lessons
///
/// Copied lessons start out not completed, one year later than the source.
async fn copy_lessons(
    conn: &impl ConnectionTrait,
    from: &str,
    to: &str,
    levels: &LevelMap,
) -> Result<(u64, u64), InternalError> {
    let chapters = chapter::Entity::find()
        .filter(chapter::Column::AcademicYear.eq(from))
        .order_by_asc(chapter::Column::Id)
        .all(conn)
        .await
        .map_err(|e| InternalError::database("list_chapters_for_copy", e))?;

    let mut lesson_count = 0u64;
    for old_chapter in &chapters {
        let new_chapter = chapter::ActiveModel {
            name: Set(old_chapter.name.clone()),
            subject_id: Set(old_chapter.subject_id),
            level_id: Set(remap(levels, old_chapter.level_id)),
            academic_year: Set(to.to_string()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("copy_chapter", e))?;

        let lessons = lesson::Entity::find()
            .filter(lesson::Column::ChapterId.eq(old_chapter.id))
            .order_by_asc(lesson::Column::OrderIndex)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_lessons_for_copy", e))?;

        for old_lesson in &lessons {
            lesson::ActiveModel {
                chapter_id: Set(new_chapter.id),
                teacher_id: Set(old_lesson.teacher_id.clone()),
                title: Set(old_lesson.title.clone()),
                objectives: Set(old_lesson.objectives.clone()),
                planned_date: Set(shift_planned_date(&old_lesson.planned_date)),
                planned_duration: Set(old_lesson.planned_duration),
                order_index: Set(old_lesson.order_index),
                completed_at: Set(None),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("copy_lesson", e))?;
        }
        lesson_count += lessons.len() as u64;
    }

    Ok((chapters.len() as u64, lesson_count))
}

async fn copy_inspector_assignments(
    conn: &impl ConnectionTrait,
    from: &str,
    to: &str,
) -> Result<u64, InternalError> {
    let rows = inspector_assignment::Entity::find()
        .filter(inspector_assignment::Column::AcademicYear.eq(from))
        .all(conn)
        .await
        .map_err(|e| InternalError::database("list_inspector_assignments_for_copy", e))?;

    for row in &rows {
        inspector_assignment::ActiveModel {
            inspector_id: Set(row.inspector_id.clone()),
            teacher_id: Set(row.teacher_id.clone()),
            academic_year: Set(to.to_string()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("copy_inspector_assignment", e))?;
    }

    Ok(rows.len() as u64)
}

async fn copy_sg_assignments(
    conn: &impl ConnectionTrait,
    from: &str,
    to: &str,
    levels: &LevelMap,
) -> Result<u64, InternalError> {
    let rows = sg_assignment::Entity::find()
        .filter(sg_assignment::Column::AcademicYear.eq(from))
        .all(conn)
        .await
        .map_err(|e| InternalError::database("list_sg_assignments_for_copy", e))?;

    for row in &rows {
        sg_assignment::ActiveModel {
            sg_id: Set(row.sg_id.clone()),
            level_id: Set(remap(levels, row.level_id)),
            academic_year: Set(to.to_string()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("copy_sg_assignment", e))?;
    }

    Ok(rows.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{seed_year_fixture, setup_test_db};
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_first_year_becomes_active_without_copying() {
        let store = AcademicYearStore::new(setup_test_db().await);

        let rollover = store
            .create_year("2024-2025", &CopyOptions::default())
            .await
            .unwrap();

        assert!(rollover.year.is_active);
        assert_eq!(rollover.previous, None);
        assert_eq!(rollover.copied, CopySummary::default());
        assert_eq!(store.require_active_name().await.unwrap(), "2024-2025");
    }

    #[tokio::test]
    async fn test_rollover_archives_previous_year() {
        let store = AcademicYearStore::new(setup_test_db().await);
        store.create_year("2024-2025", &CopyOptions::default()).await.unwrap();
        store.create_year("2025-2026", &CopyOptions::default()).await.unwrap();

        let active: Vec<_> = academic_year::Entity::find()
            .filter(academic_year::Column::IsActive.eq(true))
            .all(&store.db)
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "2025-2026");
        assert_eq!(store.list_names().await.unwrap(), vec!["2024-2025", "2025-2026"]);
    }

    #[tokio::test]
    async fn test_duplicate_year_is_rejected_and_nothing_changes() {
        let store = AcademicYearStore::new(setup_test_db().await);
        store.create_year("2024-2025", &CopyOptions::default()).await.unwrap();

        let result = store.create_year("2024-2025", &CopyOptions::default()).await;
        assert!(matches!(
            result,
            Err(InternalError::AcademicYear(AcademicYearError::Duplicate(_)))
        ));
        assert_eq!(store.require_active_name().await.unwrap(), "2024-2025");
    }

    #[tokio::test]
    async fn test_invalid_names_are_rejected() {
        let store = AcademicYearStore::new(setup_test_db().await);

        assert!(matches!(
            store.create_year("", &CopyOptions::default()).await,
            Err(InternalError::AcademicYear(AcademicYearError::EmptyName))
        ));
        assert!(matches!(
            store.create_year("2024-2026", &CopyOptions::default()).await,
            Err(InternalError::AcademicYear(AcademicYearError::InvalidName(_)))
        ));
        assert!(store.list_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_default_options_copy_everything_but_lessons() {
        let db = setup_test_db().await;
        let fixture = seed_year_fixture(&db, "2024-2025").await;
        let store = AcademicYearStore::new(db.clone());

        let rollover = store
            .create_year("2025-2026", &CopyOptions::default())
            .await
            .unwrap();

        assert_eq!(rollover.previous.as_deref(), Some("2024-2025"));
        assert_eq!(rollover.copied.levels, 2);
        assert_eq!(rollover.copied.teachers, 1);
        assert_eq!(rollover.copied.classes, 1);
        assert_eq!(rollover.copied.chapters, 0);
        assert_eq!(rollover.copied.lessons, 0);
        assert_eq!(rollover.copied.inspector_assignments, 1);
        assert_eq!(rollover.copied.sg_assignments, 1);

        // Classes and SG assignments point at the copied levels
        let new_levels = level::Entity::find()
            .filter(level::Column::AcademicYear.eq("2025-2026"))
            .all(&db)
            .await
            .unwrap();
        let new_level_ids: Vec<i32> = new_levels.iter().map(|l| l.id).collect();

        let new_class = class::Entity::find()
            .filter(class::Column::AcademicYear.eq("2025-2026"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert!(new_level_ids.contains(&new_class.level_id));
        assert!(!fixture.level_ids.contains(&new_class.level_id));

        let new_sg = sg_assignment::Entity::find()
            .filter(sg_assignment::Column::AcademicYear.eq("2025-2026"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert!(new_level_ids.contains(&new_sg.level_id));
    }

    #[tokio::test]
    async fn test_copying_lessons_resets_completion() {
        let db = setup_test_db().await;
        seed_year_fixture(&db, "2024-2025").await;
        let store = AcademicYearStore::new(db.clone());

        let options = CopyOptions {
            lessons: true,
            ..CopyOptions::default()
        };
        let rollover = store.create_year("2025-2026", &options).await.unwrap();
        assert_eq!(rollover.copied.chapters, 1);
        assert_eq!(rollover.copied.lessons, 2);

        let new_chapter = chapter::Entity::find()
            .filter(chapter::Column::AcademicYear.eq("2025-2026"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let new_lessons = lesson::Entity::find()
            .filter(lesson::Column::ChapterId.eq(new_chapter.id))
            .all(&db)
            .await
            .unwrap();
        assert_eq!(new_lessons.len(), 2);
        assert!(new_lessons.iter().all(|l| l.completed_at.is_none()));
        let mut dates: Vec<&str> = new_lessons.iter().map(|l| l.planned_date.as_str()).collect();
        dates.sort();
        assert_eq!(dates, vec!["2025-10-01", "2025-10-08"]);

        // The source year keeps its completed lesson
        let completed_in_source = lesson::Entity::find()
            .filter(lesson::Column::CompletedAt.is_not_null())
            .count(&db)
            .await
            .unwrap();
        assert_eq!(completed_in_source, 1);
    }

    #[test]
    fn test_shift_planned_date() {
        assert_eq!(shift_planned_date("2024-10-08"), "2025-10-08");
        assert_eq!(shift_planned_date("2024-02-29"), "2025-02-28");
        assert_eq!(shift_planned_date("next week"), "next week");
    }

    #[tokio::test]
    async fn test_unselected_categories_are_not_copied() {
        let db = setup_test_db().await;
        let fixture = seed_year_fixture(&db, "2024-2025").await;
        let store = AcademicYearStore::new(db.clone());

        let options = CopyOptions {
            levels: false,
            teachers: false,
            classes: true,
            lessons: false,
            inspector_assignments: false,
            sg_assignments: false,
        };
        let rollover = store.create_year("2025-2026", &options).await.unwrap();

        assert_eq!(
            rollover.copied,
            CopySummary {
                classes: 1,
                ..CopySummary::default()
            }
        );

        // Without copied levels the class keeps its original level reference
        let new_class = class::Entity::find()
            .filter(class::Column::AcademicYear.eq("2025-2026"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert!(fixture.level_ids.contains(&new_class.level_id));
    }

    #[tokio::test]
    async fn test_ensure_initial_year_only_inserts_once() {
        let store = AcademicYearStore::new(setup_test_db().await);

        assert!(store.ensure_initial_year("2024-2025").await.unwrap());
        assert!(!store.ensure_initial_year("2030-2031").await.unwrap());
        assert_eq!(store.list_names().await.unwrap(), vec!["2024-2025"]);
    }
}
