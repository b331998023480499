// handlers/public/auth - token acquisition

pub mod login;
pub mod signup;

use serde::Deserialize;

pub use login::login_post;
pub use signup::signup_post;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}
