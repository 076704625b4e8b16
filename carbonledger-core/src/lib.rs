pub mod aggregate;
pub mod api;
pub mod error;
pub mod export;
pub mod normalize;
pub mod report;
