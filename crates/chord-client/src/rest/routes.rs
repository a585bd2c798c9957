//! REST endpoints

/// Builds endpoint URLs against an API base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    api_url: String,
}

impl Routes {
    pub fn new(api_url: impl Into<String>) -> Self {
        let mut api_url = api_url.into();
        while api_url.ends_with('/') {
            api_url.pop();
        }
        Self { api_url }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// `POST` create message
    pub fn channel_messages(&self, channel_id: &str) -> String {
        format!("{}/channels/{channel_id}/messages", self.api_url)
    }

    /// `DELETE` a message
    pub fn channel_message(&self, channel_id: &str, message_id: &str) -> String {
        format!("{}/channels/{channel_id}/messages/{message_id}", self.api_url)
    }

    /// `POST` create webhook
    pub fn channel_webhooks(&self, channel_id: &str) -> String {
        format!("{}/channels/{channel_id}/webhooks", self.api_url)
    }

    pub fn webhook(&self, webhook_id: &str, token: &str) -> String {
        format!("{}/webhooks/{webhook_id}/{token}", self.api_url)
    }

    /// Absolute URLs pass through; anything else is joined to the API base
    pub fn resolve(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        if endpoint.starts_with('/') {
            format!("{}{endpoint}", self.api_url)
        } else {
            format!("{}/{endpoint}", self.api_url)
        }
    }
}
