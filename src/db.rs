pub mod project_repo;
pub use project_repo::ProjectRepository;
pub mod task_repo;
pub use task_repo::TaskRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
