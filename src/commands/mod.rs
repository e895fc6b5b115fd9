pub mod generate;
pub mod sources;
