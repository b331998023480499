pub mod become_instructor;
pub mod session;
pub mod whoami;

pub use become_instructor::become_instructor_post;
pub use session::session_delete;
pub use whoami::whoami_get;
