mod auth_service;
mod comment_service;
mod error;
mod post_service;
mod user_service;

pub use auth_service::*;
pub use comment_service::*;
pub use error::*;
pub use post_service::*;
pub use user_service::*;
