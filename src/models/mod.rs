pub mod report;
pub mod token;
