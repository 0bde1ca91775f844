use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::IdentityProvider;

/// Identity backed by configuration. An empty user id means no session, which
/// the orchestrator treats as "defer the submission".
#[derive(Default)]
pub struct ConfigIdentity {}

impl IdentityProvider for ConfigIdentity {
    fn current_user(&self) -> Option<String> {
        let user_id = Config::get(ConfigKey::UserID);
        if user_id.is_empty() {
            return None;
        }

        return Some(user_id);
    }

    fn api_key(&self) -> Option<String> {
        let api_key = Config::get(ConfigKey::ApiKey);
        if api_key.is_empty() {
            return None;
        }

        return Some(api_key);
    }
}
