//! Screen implementations

pub mod dashboard;
pub mod landing;
