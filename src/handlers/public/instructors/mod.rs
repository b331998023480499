// handlers/public/instructors - the browsable directory

pub mod list;
pub mod locations;
pub mod show;
pub mod top;

pub use list::{instructors_get, DirectoryQuery};
pub use locations::locations_get;
pub use show::instructor_get;
pub use top::top_get;
