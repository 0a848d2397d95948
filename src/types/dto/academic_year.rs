use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Which record categories are duplicated into a newly created academic year
///
/// Every flag is independent of the others.
#[derive(Object, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct CopyOptions {
    pub levels: bool,
    pub teachers: bool,
    pub classes: bool,
    pub lessons: bool,
    pub inspector_assignments: bool,
    pub sg_assignments: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            levels: true,
            teachers: true,
            classes: true,
            lessons: false,
            inspector_assignments: true,
            sg_assignments: true,
        }
    }
}

/// One of the six copy flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyOption {
    Levels,
    Teachers,
    Classes,
    Lessons,
    InspectorAssignments,
    SgAssignments,
}

impl CopyOption {
    pub const ALL: [CopyOption; 6] = [
        CopyOption::Levels,
        CopyOption::Teachers,
        CopyOption::Classes,
        CopyOption::Lessons,
        CopyOption::InspectorAssignments,
        CopyOption::SgAssignments,
    ];
}

impl CopyOptions {
    pub fn get(&self, option: CopyOption) -> bool {
        match option {
            CopyOption::Levels => self.levels,
            CopyOption::Teachers => self.teachers,
            CopyOption::Classes => self.classes,
            CopyOption::Lessons => self.lessons,
            CopyOption::InspectorAssignments => self.inspector_assignments,
            CopyOption::SgAssignments => self.sg_assignments,
        }
    }

    pub fn set(&mut self, option: CopyOption, value: bool) {
        let flag = match option {
            CopyOption::Levels => &mut self.levels,
            CopyOption::Teachers => &mut self.teachers,
            CopyOption::Classes => &mut self.classes,
            CopyOption::Lessons => &mut self.lessons,
            CopyOption::InspectorAssignments => &mut self.inspector_assignments,
            CopyOption::SgAssignments => &mut self.sg_assignments,
        };
        *flag = value;
    }

    pub fn toggle(&mut self, option: CopyOption) {
        let current = self.get(option);
        self.set(option, !current);
    }
}

/// Request body for creating (rolling over to) a new academic year
#[derive(Object, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct CreateAcademicYearRequest {
    pub year_name: String,
    #[oai(default)]
    #[serde(default)]
    pub copy_options: CopyOptions,
}

#[derive(Object, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct AcademicYearResponse {
    pub year_name: String,
}
