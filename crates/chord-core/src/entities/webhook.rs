//! Webhook entity

use crate::value_objects::Snowflake;

/// Channel webhook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Webhook {
    pub id: Snowflake,
    pub channel_id: Option<Snowflake>,
    pub guild_id: Option<Snowflake>,
    pub name: Option<String>,
    pub token: Option<String>,
    pub url: Option<String>,
}

impl Webhook {
    pub fn new(id: impl Into<Snowflake>) -> Self {
        Self {
            id: id.into(),
            channel_id: None,
            guild_id: None,
            name: None,
            token: None,
            url: None,
        }
    }

    /// URL used to execute the webhook.
    ///
    /// Uses the URL the server returned, or builds one from the token under `api_base`.
    pub fn execute_url(&self, api_base: &str) -> Option<String> {
        if let Some(url) = &self.url {
            return Some(url.clone());
        }
        self.token.as_ref().map(|token| {
            format!(
                "{}/webhooks/{}/{}",
                api_base.trim_end_matches('/'),
                self.id,
                token
            )
        })
    }
}
