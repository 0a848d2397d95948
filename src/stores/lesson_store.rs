use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;

use crate::errors::InternalError;
use crate::types::db::{chapter, lesson, level, subject};
use crate::types::dto::admin::{ChapterDetails, LessonWithDetails, LevelRef, SubjectRef};

/// LessonStore reads the planned lessons of a year together with their chapters
#[derive(Debug)]
pub struct LessonStore {
    db: DatabaseConnection,
}

impl LessonStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn chapters_of(&self, academic_year: &str) -> Result<Vec<chapter::Model>, InternalError> {
        chapter::Entity::find()
            .filter(chapter::Column::AcademicYear.eq(academic_year))
            .order_by_asc(chapter::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_chapters", e))
    }

    async fn lessons_in(&self, chapter_ids: Vec<i32>) -> Result<Vec<lesson::Model>, InternalError> {
        if chapter_ids.is_empty() {
            return Ok(Vec::new());
        }
        lesson::Entity::find()
            .filter(lesson::Column::ChapterId.is_in(chapter_ids))
            .order_by_asc(lesson::Column::ChapterId)
            .order_by_asc(lesson::Column::OrderIndex)
            .order_by_asc(lesson::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_lessons", e))
    }

    /// Every lesson of `academic_year` with its chapter, subject and level
    ///
    /// Ordered by chapter, then by position within the chapter. Lessons whose
    /// subject or level row has disappeared are skipped.
    pub async fn list_with_details(
        &self,
        academic_year: &str,
    ) -> Result<Vec<LessonWithDetails>, InternalError> {
        let chapters = self.chapters_of(academic_year).await?;
        let lessons = self.lessons_in(chapters.iter().map(|c| c.id).collect()).await?;

        let subjects: HashMap<i32, subject::Model> = subject::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_subjects", e))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let level_ids: Vec<i32> = chapters.iter().map(|c| c.level_id).collect();
        let levels: HashMap<i32, level::Model> = level::Entity::find()
            .filter(level::Column::Id.is_in(level_ids))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_levels", e))?
            .into_iter()
            .map(|l| (l.id, l))
            .collect();

        let mut details: HashMap<i32, ChapterDetails> = HashMap::new();
        for ch in &chapters {
            let (Some(subj), Some(lvl)) = (subjects.get(&ch.subject_id), levels.get(&ch.level_id))
            else {
                tracing::warn!(chapter_id = ch.id, "Chapter references a missing subject or level");
                continue;
            };
            details.insert(
                ch.id,
                ChapterDetails {
                    id: ch.id,
                    name: ch.name.clone(),
                    subject: SubjectRef {
                        id: subj.id,
                        name: subj.name.clone(),
                        code: subj.code.clone(),
                    },
                    level: LevelRef {
                        id: lvl.id,
                        name: lvl.name.clone(),
                        code: lvl.code.clone(),
                    },
                },
            );
        }

        Ok(lessons
            .into_iter()
            .filter_map(|l| {
                let chapter = details.get(&l.chapter_id)?.clone();
                Some(LessonWithDetails {
                    id: l.id,
                    title: l.title,
                    objectives: l.objectives,
                    planned_date: l.planned_date,
                    planned_duration: l.planned_duration,
                    order_index: l.order_index,
                    teacher_id: l.teacher_id,
                    completed: l.completed_at.is_some(),
                    chapter,
                })
            })
            .collect())
    }

    /// Incomplete lessons of `academic_year` planned strictly before `today`
    pub async fn overdue(
        &self,
        academic_year: &str,
        today: NaiveDate,
    ) -> Result<Vec<lesson::Model>, InternalError> {
        let chapters = self.chapters_of(academic_year).await?;
        let lessons = self.lessons_in(chapters.iter().map(|c| c.id).collect()).await?;

        Ok(lessons
            .into_iter()
            .filter(|l| l.completed_at.is_none())
            .filter(|l| match NaiveDate::parse_from_str(&l.planned_date, "%Y-%m-%d") {
                Ok(planned) => planned < today,
                Err(_) => {
                    tracing::warn!(lesson_id = l.id, planned_date = %l.planned_date, "Unparseable planned date");
                    false
                }
            })
            .collect())
    }
}
