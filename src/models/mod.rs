pub mod prediction;
pub mod response;
pub mod session;
pub mod toast;

pub use prediction::*;
pub use response::*;
pub use session::*;
pub use toast::*;
