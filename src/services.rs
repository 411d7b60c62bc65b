pub mod auth;
pub use auth::AuthService;
pub mod task_service;
pub use task_service::TaskService;
pub mod project_service;
pub use project_service::ProjectService;
pub mod dashboard_service;
pub use dashboard_service::DashboardService;
