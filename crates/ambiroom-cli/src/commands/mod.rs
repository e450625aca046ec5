pub mod config;
pub mod session;
pub mod sounds;
pub mod timer;
