//! REST layer
//!
//! HTTP seam, request assembly, endpoints and message options.

mod http;
mod options;
mod payload;
mod routes;

pub use http::{HttpClient, ReqwestHttp, RestRequest, RestResponse, AUDIT_LOG_REASON_HEADER};
pub use options::{FileAttachment, MessageOptions, RequestOptions};
pub use payload::PayloadBuilder;
pub use routes::Routes;
