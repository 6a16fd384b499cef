pub mod compile;
pub mod platform;
pub mod version;
