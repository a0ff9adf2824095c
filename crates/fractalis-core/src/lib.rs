pub mod autozoom;
pub mod config;
pub mod consts;
pub mod device;
pub mod engine;
pub mod error;
pub mod input;
pub mod kernel;
pub mod led;
pub mod navigate;
pub mod render;
pub mod scalar;
pub mod scanner;
pub mod snapshot;
pub mod state;
