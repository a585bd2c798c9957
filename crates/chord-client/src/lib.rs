//! # chord-client
//!
//! Client facade over the gateway connection: login, notifications, entity cache
//! access and the REST operations a bot needs.

pub mod client;
pub mod rest;

pub use client::{Client, ClientBuilder, WebhookPayload};
pub use rest::{
    FileAttachment, HttpClient, MessageOptions, PayloadBuilder, RequestOptions, ReqwestHttp,
    RestRequest, RestResponse, Routes,
};

pub use chord_common::{ClientConfig, ClientError, ClientResult};
pub use chord_core::{Channel, Embed, Guild, Member, Message, Snowflake, User, Webhook};
pub use chord_gateway::{ClientEvent, ConnectionStatus, EventKind, Intents};
pub use reqwest::Method;
