pub mod albums;
pub mod auth;
pub mod health;
pub mod photos;
