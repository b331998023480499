pub mod review_get;
pub mod review_put;

pub use review_get::review_get;
pub use review_put::review_put;
