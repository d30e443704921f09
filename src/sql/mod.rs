pub mod parser;
pub mod planner;
