pub mod deployment_log;
pub mod project;
pub mod user_profile;
