//! Request assembly
//!
//! Adds the bot authorization and user agent headers to every request and turns
//! message options into a JSON body plus file parts.

use chord_gateway::events::payloads::MessageReferencePayload;
use reqwest::Method;
use serde_json::{json, Map, Value};

use super::http::RestRequest;
use super::options::{FileAttachment, MessageOptions, RequestOptions};

pub struct PayloadBuilder {
    headers: Vec<(String, String)>,
}

impl PayloadBuilder {
    pub fn new(token: &str, user_agent: &str) -> Self {
        Self {
            headers: vec![
                ("Authorization".to_string(), format!("Bot {token}")),
                ("User-Agent".to_string(), user_agent.to_string()),
            ],
        }
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Build a request carrying the default headers
    pub fn create(&self, url: impl Into<String>, method: Method, options: RequestOptions) -> RestRequest {
        let mut headers: Vec<(String, String)> = self
            .headers
            .iter()
            .filter(|(name, _)| {
                !options
                    .headers
                    .iter()
                    .any(|(extra, _)| extra.eq_ignore_ascii_case(name))
            })
            .cloned()
            .collect();
        headers.extend(options.headers);

        RestRequest {
            method,
            url: url.into(),
            headers,
            body: options.body,
            files: options.files,
            reason: options.reason,
        }
    }

    /// JSON body and file parts for a message
    ///
    /// Embeds without any recognised field are dropped.
    pub fn resolve_message(options: MessageOptions) -> (Value, Vec<FileAttachment>) {
        let mut body = Map::new();

        if let Some(content) = options.content {
            body.insert("content".to_string(), Value::String(content));
        }
        if options.tts {
            body.insert("tts".to_string(), Value::Bool(true));
        }

        let embeds: Vec<Value> = options
            .embeds
            .into_iter()
            .filter(chord_core::Embed::has_content)
            .filter_map(|embed| serde_json::to_value(embed).ok())
            .collect();
        if !embeds.is_empty() {
            body.insert("embeds".to_string(), Value::Array(embeds));
        }

        if let Some(reference) = options.reply_to {
            body.insert(
                "message_reference".to_string(),
                json!(MessageReferencePayload::from(&reference)),
            );
        }

        (Value::Object(body), options.files)
    }
}

impl std::fmt::Debug for PayloadBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the token
        f.debug_struct("PayloadBuilder").finish_non_exhaustive()
    }
}
