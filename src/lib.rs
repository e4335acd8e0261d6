pub mod host;
pub mod nlcheck;
