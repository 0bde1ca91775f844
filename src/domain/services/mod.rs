mod analytics;
mod message_store;
mod orchestrator;
mod prefs;
mod projection;
mod streaming;

pub use analytics::*;
pub use message_store::*;
pub use orchestrator::*;
pub use prefs::*;
pub use projection::*;
pub use streaming::*;
