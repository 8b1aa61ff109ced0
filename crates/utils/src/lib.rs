pub mod assets;
pub mod format;
pub mod response;
