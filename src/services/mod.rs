pub mod account_service;
pub mod directory_service;
pub mod profile_service;
pub mod review_service;

pub use account_service::{AccountService, AuthPayload};
pub use directory_service::{DirectoryPage, DirectoryService, InstructorDetail, Listings};
pub use profile_service::{ProfileSaved, ProfileService};
pub use review_service::ReviewService;
