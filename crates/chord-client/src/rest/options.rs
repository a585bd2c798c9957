//! Request and message options

use chord_core::{Embed, Message, MessageReference};
use serde_json::Value;

/// File uploaded as a multipart part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub name: String,
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

impl FileAttachment {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// What to send as a message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOptions {
    pub content: Option<String>,
    pub tts: bool,
    pub embeds: Vec<Embed>,
    pub files: Vec<FileAttachment>,
    /// Message this one replies to
    pub reply_to: Option<MessageReference>,
}

impl MessageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_tts(mut self, tts: bool) -> Self {
        self.tts = tts;
        self
    }

    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn with_file(mut self, file: FileAttachment) -> Self {
        self.files.push(file);
        self
    }

    pub fn replying_to(mut self, message: &Message) -> Self {
        self.reply_to = Some(message.as_reference());
        self
    }
}

impl From<&str> for MessageOptions {
    fn from(content: &str) -> Self {
        Self::new().with_content(content)
    }
}

impl From<String> for MessageOptions {
    fn from(content: String) -> Self {
        Self::new().with_content(content)
    }
}

impl From<Embed> for MessageOptions {
    fn from(embed: Embed) -> Self {
        Self::new().with_embed(embed)
    }
}

/// Options for a raw REST request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub body: Option<Value>,
    /// Extra headers; override the defaults with the same name
    pub headers: Vec<(String, String)>,
    /// Audit log reason
    pub reason: Option<String>,
    pub files: Vec<FileAttachment>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_files(mut self, files: Vec<FileAttachment>) -> Self {
        self.files = files;
        self
    }
}
