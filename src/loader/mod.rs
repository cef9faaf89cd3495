pub mod parser;
pub mod sndlib;
