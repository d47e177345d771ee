pub mod application;
pub mod auth;
pub mod kyc;
pub mod person;
pub mod session;
pub mod submission;
