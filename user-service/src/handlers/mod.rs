pub mod auth;
pub mod health;

pub use auth::login;
pub use health::health_check;
