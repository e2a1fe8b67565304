pub mod comments;
pub mod customers;
pub mod issues;
pub mod list;
pub mod projects;
