pub mod emission;
pub mod factor;
pub mod input;
pub mod report;
pub mod scope;
pub mod sheet;
