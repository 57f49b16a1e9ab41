mod comment_repo;
mod post_repo;
mod user_repo;

pub use comment_repo::*;
pub use post_repo::*;
pub use user_repo::*;
