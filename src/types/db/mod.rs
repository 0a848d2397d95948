// Database entities - SeaORM models
pub mod academic_year;
pub mod chapter;
pub mod class;
pub mod inspector_assignment;
pub mod lesson;
pub mod level;
pub mod notification;
pub mod session;
pub mod sg_assignment;
pub mod subject;
pub mod teacher_enrollment;
pub mod user;
