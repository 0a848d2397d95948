// Services layer - Business logic and orchestration
pub mod auth_service;
pub mod notification_service;
pub mod seeder;
pub mod token_service;

pub use auth_service::AuthService;
pub use notification_service::NotificationService;
pub use token_service::TokenService;
