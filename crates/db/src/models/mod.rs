pub mod album;
pub mod ids;
pub mod photo;
pub mod user;
