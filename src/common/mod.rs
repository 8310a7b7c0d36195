pub mod nullable;
pub mod response;
pub mod upload;
