mod launcher_service;
mod requirement_service;

pub use launcher_service::LauncherService;
pub use requirement_service::{DETAILS_LOG_NAME, RequirementService, TABLE_LOG_NAME};
