// api-factory/src/lib.rs
//! Templated JSON request methods.
//!
//! An [`Api`] creates request methods for a verb and a URL template such as
//! `/api/card/:id`. Calling a method substitutes placeholders from the call
//! data, sends the rest as a JSON body or query string, and resolves with the
//! parsed response body. Every settled request is announced on the
//! [`Notifier`] the `Api` was built with.
pub mod api;
pub mod data;
pub mod encode;
pub mod error;
pub mod http;
pub mod method;
pub mod notify;
pub mod options;
pub mod query;
pub mod template;

pub use api::{
    Api, ApiMethod, CancelHandle, Cancelable, CancelableRequest, PreparedRequest,
    TransportHandle, XhrMethod,
};
pub use data::Data;
pub use error::ApiError;
pub use http::{HttpError, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use method::Method;
pub use notify::{Notifier, StatusEvent, Subscription, DEFAULT_CHANNEL_CAPACITY};
pub use options::{MethodOptions, Options, RequestConfig, TransformContext, TransformFn};
pub use template::UrlTemplate;

// Cancellation signals are tokio-util tokens
pub use tokio_util::sync::CancellationToken;

// Re-export reqwest transport when feature is enabled
#[cfg(feature = "reqwest")]
pub use http::ReqwestTransport;
