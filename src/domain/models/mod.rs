mod artifact;
mod event;
mod execution;
mod failure;
mod generation;
mod identity;
mod message;
mod phase;
mod request;
mod role;
mod sandbox;
mod session;

pub use artifact::*;
pub use event::*;
pub use execution::*;
pub use failure::*;
pub use generation::*;
pub use identity::*;
pub use message::*;
pub use phase::*;
pub use request::*;
pub use role::*;
pub use sandbox::*;
pub use session::*;
