// Stores layer - Data access and repository pattern
pub mod academic_year_store;
pub mod assignment_store;
pub mod catalog_store;
pub mod credential_store;
pub mod lesson_store;
pub mod notification_store;
pub mod session_store;

pub use academic_year_store::{AcademicYearStore, CopySummary, Rollover};
pub use assignment_store::AssignmentStore;
pub use catalog_store::CatalogStore;
pub use credential_store::{CredentialStore, NewUser};
pub use lesson_store::LessonStore;
pub use notification_store::{NewNotification, NotificationStore};
pub use session_store::SessionStore;
