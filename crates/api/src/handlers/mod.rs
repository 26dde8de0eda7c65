pub mod auth;
pub mod deploy;
pub mod deployment;
pub mod generate;
pub mod profile;
pub mod project;
