pub mod auth_service;
pub mod candidate_service;
pub mod department_service;
pub mod lifecycle_service;
pub mod panel_service;
pub mod position_service;
pub mod problem_service;
pub mod settings_service;
pub mod stack_service;
pub mod submission_service;
