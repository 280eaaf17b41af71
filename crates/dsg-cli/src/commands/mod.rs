pub mod completions;
pub mod launch;
pub mod serve;
pub mod stations;
pub mod views;
