pub mod compiler;
pub mod engine;
pub mod session;
