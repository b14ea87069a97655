//! Admin SDK Directory API.

mod client;
pub use client::{create_client, DirectoryClient};

mod types;
pub use types::{ListUsersRequest, User, UserName, UsersPage};
