pub mod partition;
pub mod planner;
