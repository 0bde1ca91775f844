mod catalogs;
mod config;

pub use catalogs::*;
pub use config::*;
