use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::db::{level, subject};

#[derive(Object, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectResponse {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
}

impl From<subject::Model> for SubjectResponse {
    fn from(model: subject::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            code: model.code,
            description: model.description,
        }
    }
}

#[derive(Object, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: String,
    /// Stored uppercased
    pub code: String,
    #[oai(default)]
    #[serde(default)]
    pub description: Option<String>,
}

/// School cycle a level belongs to
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelCategory {
    #[oai(rename = "collège")]
    #[serde(rename = "collège")]
    College,
    #[oai(rename = "lycée")]
    #[serde(rename = "lycée")]
    Lycee,
}

impl LevelCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelCategory::College => "collège",
            LevelCategory::Lycee => "lycée",
        }
    }
}

impl FromStr for LevelCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "collège" => Ok(LevelCategory::College),
            "lycée" => Ok(LevelCategory::Lycee),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Object, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct LevelResponse {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub category: String,
    pub academic_year: String,
}

impl From<level::Model> for LevelResponse {
    fn from(model: level::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            code: model.code,
            category: model.category,
            academic_year: model.academic_year,
        }
    }
}

#[derive(Object, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLevelRequest {
    pub name: String,
    /// Stored uppercased
    pub code: String,
    pub category: LevelCategory,
}

#[derive(Object, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRef {
    pub id: i32,
    pub name: String,
    pub code: String,
}

#[derive(Object, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRef {
    pub id: i32,
    pub name: String,
    pub code: String,
}

#[derive(Object, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterDetails {
    pub id: i32,
    pub name: String,
    pub subject: SubjectRef,
    pub level: LevelRef,
}

/// Lesson with its chapter, subject and level, as listed in the admin table
#[derive(Object, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct LessonWithDetails {
    pub id: i32,
    pub title: String,
    pub objectives: Option<String>,
    pub planned_date: String,
    pub planned_duration: i32,
    pub order_index: i32,
    pub teacher_id: String,
    pub completed: bool,
    pub chapter: ChapterDetails,
}
