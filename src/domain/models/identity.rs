use std::sync::Arc;

pub type IdentityBox = Arc<dyn IdentityProvider + Send + Sync>;

/// The identity/session collaborator. `None` from `current_user` means the
/// submission must be deferred until the user authenticates.
pub trait IdentityProvider {
    fn current_user(&self) -> Option<String>;
    fn api_key(&self) -> Option<String>;
}
