pub mod event_dispatcher;
pub mod user_service;
pub mod webhook_verifier;

pub use event_dispatcher::*;
pub use webhook_verifier::*;
