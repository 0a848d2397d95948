// Client layer - typed API client and the dashboard workflows built on it
pub mod api_client;
pub mod error;
pub mod forms;
pub mod lessons_table;
pub mod notification_center;
pub mod query_cache;
pub mod session;
pub mod storage;
pub mod wizard;
pub mod year_context;

pub use api_client::{ApiClient, HttpTransport, ReqwestTransport};
pub use error::ClientError;
pub use forms::{CatalogGateway, LevelForm, SubjectForm};
pub use lessons_table::{LessonFilters, LessonsTable};
pub use notification_center::{NotificationCenter, NotificationGateway};
pub use query_cache::QueryCache;
pub use session::Session;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use wizard::{AcademicYearWizard, WizardStep};
pub use year_context::{AcademicYearContext, AcademicYearGateway};
