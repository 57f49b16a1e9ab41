mod comment_repo_mysql;
mod post_repo_mysql;
mod user_repo_mysql;

pub use comment_repo_mysql::*;
pub use post_repo_mysql::*;
pub use user_repo_mysql::*;

mod util;
