pub mod auth;
pub mod health;
pub mod pages;
pub mod prediction;
pub mod preferences;
pub mod toasts;

pub use auth::*;
pub use health::*;
pub use pages::*;
pub use prediction::*;
pub use preferences::*;
pub use toasts::*;
