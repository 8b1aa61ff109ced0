pub mod album;
pub mod photo;
pub mod user;
