pub mod auth_dto;
pub mod candidate_dto;
pub mod directory_dto;
pub mod panel_dto;
pub mod portal_dto;
pub mod settings_dto;
pub mod submission_dto;
