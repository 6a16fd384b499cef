//! Built-in passes.

pub mod decompose;
pub mod optimize;

pub use decompose::DecomposeToffoli;
pub use optimize::Optimize;
