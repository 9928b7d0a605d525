pub mod authentication_controller;
pub mod health_controller;
pub mod role_controller;
pub mod task_controller;
pub mod user_controller;

pub use authentication_controller::AuthenticationController;
pub use health_controller::HealthController;
pub use role_controller::RoleController;
pub use task_controller::TaskController;
pub use user_controller::UserController;
