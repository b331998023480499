pub mod account;
pub mod instructor;
pub mod review;

pub use account::{Account, Role};
pub use instructor::{FeaturedTrack, InstructorListing, InstructorProfile, ProductRecommendation};
pub use review::{Review, ReviewDraft};
