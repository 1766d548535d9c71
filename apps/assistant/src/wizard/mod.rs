pub mod enhancement;
pub mod enhancer;
pub mod handlers;
pub mod session;
pub mod state;
