pub mod env;
pub mod topology;
pub mod utils;
