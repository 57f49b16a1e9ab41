mod auth_service_impl;
mod comment_service_impl;
mod credential_hasher_fake;
mod post_service_impl;
mod user_service_impl;

pub use auth_service_impl::*;
pub use comment_service_impl::*;
pub use credential_hasher_fake::*;
pub use post_service_impl::*;
pub use user_service_impl::*;
