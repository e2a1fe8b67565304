pub mod comments;
pub mod customers;
pub mod health;
pub mod issues;
pub mod projects;
pub mod users;
