pub mod analyze;
pub mod check;
pub mod generate;
pub mod odds;
