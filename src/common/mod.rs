pub mod download;
pub mod extract;
pub mod response;
pub mod workspace;
