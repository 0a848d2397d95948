// Internal types - never serialized to API clients directly
pub mod auth;
pub mod context;
pub mod role;
pub mod year_label;

pub use auth::{AuthenticatedUser, Claims};
pub use context::RequestContext;
pub use role::{DashboardRoute, Role};
pub use year_label::{next_year_label, validate_year_name};
