pub mod config;
pub mod controller;
pub mod episode;
pub mod observation;
pub mod reward;
pub mod traffic;
