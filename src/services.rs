pub mod attachment_service;
pub use attachment_service::AttachmentService;
pub mod auth;
pub use auth::AuthService;
pub mod catalog;
pub use catalog::RequirementsCatalog;
pub mod onboarding_service;
pub use onboarding_service::OnboardingService;
pub mod person_service;
pub mod submission_service;
pub use submission_service::SubmissionService;
