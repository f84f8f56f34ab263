// api-factory/src/api.rs
use crate::data::Data;
use crate::error::ApiError;
use crate::http::{HttpError, HttpRequest, HttpResponse, HttpTransport};
use crate::method::Method;
use crate::notify::{Notifier, StatusEvent};
use crate::options::{MethodOptions, Options, RequestConfig};
use crate::query;
use crate::template::UrlTemplate;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

struct Shared<T> {
    transport: T,
    basename: String,
    notifier: Notifier,
}

/// Creates request methods over one transport, basename and notification channel
pub struct Api<T: HttpTransport> {
    shared: Arc<Shared<T>>,
}

impl<T: HttpTransport> Clone for Api<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: HttpTransport> Api<T> {
    pub fn new(transport: T, notifier: Notifier) -> Self {
        Self::with_basename(transport, notifier, "")
    }

    /// `basename` is prefixed to every request URL
    pub fn with_basename(transport: T, notifier: Notifier, basename: impl Into<String>) -> Self {
        Self {
            shared: Arc::new(Shared {
                transport,
                basename: basename.into(),
                notifier,
            }),
        }
    }

    pub fn basename(&self) -> &str {
        &self.shared.basename
    }

    pub fn notifier(&self) -> &Notifier {
        &self.shared.notifier
    }

    pub fn get(&self, template: &str, options: impl Into<MethodOptions>) -> ApiMethod<T> {
        self.make_method(Method::Get, template, options.into())
    }

    pub fn get_with_xhr(&self, template: &str, options: impl Into<MethodOptions>) -> XhrMethod<T> {
        XhrMethod {
            inner: self.make_method(Method::GetWithXhr, template, options.into()),
        }
    }

    pub fn post(&self, template: &str, options: impl Into<MethodOptions>) -> ApiMethod<T> {
        self.make_method(Method::Post, template, options.into())
    }

    pub fn put(&self, template: &str, options: impl Into<MethodOptions>) -> ApiMethod<T> {
        self.make_method(Method::Put, template, options.into())
    }

    pub fn delete(&self, template: &str, options: impl Into<MethodOptions>) -> ApiMethod<T> {
        self.make_method(Method::Delete, template, options.into())
    }

    /// Creator for any verb, as used by the named creators above
    pub fn method(&self, method: Method, template: &str, options: impl Into<MethodOptions>) -> ApiMethod<T> {
        self.make_method(method, template, options.into())
    }

    fn make_method(&self, method: Method, template: &str, options: MethodOptions) -> ApiMethod<T> {
        ApiMethod {
            api: self.clone(),
            method,
            template: UrlTemplate::parse(template),
            defaults: options.into_options(),
        }
    }

    async fn execute(&self, prepared: PreparedRequest) -> Result<Value, ApiError> {
        let PreparedRequest {
            request,
            url,
            data,
            config,
        } = prepared;

        debug!(method = request.method.as_str(), url = %request.url, "issuing request");

        let exchange = self.shared.transport.send(request);
        let outcome = match &config.cancelled {
            Some(signal) => tokio::select! {
                biased;
                _ = signal.cancelled() => Outcome::Aborted,
                result = exchange => Outcome::Completed(result),
            },
            None => Outcome::Completed(exchange.await),
        };

        let (status, result) = match outcome {
            Outcome::Aborted => {
                debug!(url = %url, "request aborted by cancellation signal");
                (
                    0,
                    Err(ApiError::Status {
                        status: 0,
                        data: Value::String(String::new()),
                        is_cancelled: true,
                    }),
                )
            }
            Outcome::Completed(Err(e)) => (0, Err(ApiError::Transport(e))),
            Outcome::Completed(Ok(response)) => {
                let body = parse_body(&response.body);
                let result = if (200..=299).contains(&response.status) {
                    Ok(config.transform(body, &data))
                } else {
                    Err(ApiError::Status {
                        status: response.status,
                        data: body,
                        is_cancelled: false,
                    })
                };
                (response.status, result)
            }
        };

        if !config.no_event {
            self.shared.notifier.publish(StatusEvent { status, url });
        }

        result
    }
}

#[cfg(feature = "reqwest")]
impl Default for Api<crate::http::ReqwestTransport> {
    fn default() -> Self {
        Self::new(crate::http::ReqwestTransport::new(), Notifier::default())
    }
}

enum Outcome {
    Completed(Result<HttpResponse, HttpError>),
    Aborted,
}

/// JSON if it parses, raw text otherwise
fn parse_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// A call turned into a wire request, before it is issued
pub struct PreparedRequest {
    pub request: HttpRequest,
    /// Substituted URL without the basename, as reported to listeners
    pub url: String,
    /// Data left after substitution and dropping undefined fields
    pub data: Data,
    pub config: RequestConfig,
}

/// A request method for one verb and URL template
pub struct ApiMethod<T: HttpTransport> {
    api: Api<T>,
    method: Method,
    template: UrlTemplate,
    defaults: Options,
}

impl<T: HttpTransport> Clone for ApiMethod<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            method: self.method,
            template: self.template.clone(),
            defaults: self.defaults.clone(),
        }
    }
}

impl<T: HttpTransport> ApiMethod<T> {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }

    /// Merge options, substitute the template and encode the remaining data
    pub fn prepare(&self, data: impl Into<Data>, options: Options) -> Result<PreparedRequest, ApiError> {
        let config = self.defaults.clone().merge(options).resolve();
        let mut data = data.into();

        let mut url = self.template.render(self.method, &mut data, &config.raw);
        data.drop_undefined();

        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        let body = if self.method.has_body() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
            Some(serde_json::to_vec(&data.to_json())?)
        } else {
            query::append(&mut url, &query::stringify(&data));
            None
        };

        let request = HttpRequest {
            method: self.method.http_method(),
            url: format!("{}{}", self.api.basename(), url),
            headers,
            body,
        };

        Ok(PreparedRequest {
            request,
            url,
            data,
            config,
        })
    }

    pub async fn call(&self, data: impl Into<Data>) -> Result<Value, ApiError> {
        self.call_with(data, Options::default()).await
    }

    pub async fn call_with(&self, data: impl Into<Data>, options: Options) -> Result<Value, ApiError> {
        let prepared = self.prepare(data, options)?;
        self.api.execute(prepared).await
    }
}

/// The GET_WITH_XHR request method
pub struct XhrMethod<T: HttpTransport> {
    inner: ApiMethod<T>,
}

impl<T: HttpTransport + 'static> XhrMethod<T> {
    pub fn template(&self) -> &UrlTemplate {
        self.inner.template()
    }

    pub fn call(&self, data: impl Into<Data>) -> Result<CancelableRequest, ApiError> {
        self.call_with(data, Options::default())
    }

    /// Issue the request on the runtime right away.
    ///
    /// Must be called from within a tokio runtime.
    pub fn call_with(&self, data: impl Into<Data>, options: Options) -> Result<CancelableRequest, ApiError> {
        let mut prepared = self.inner.prepare(data, options)?;

        // The caller's signal still aborts through the child token
        let abort = match prepared.config.cancelled.take() {
            Some(signal) => signal.child_token(),
            None => CancellationToken::new(),
        };
        prepared.config.cancelled = Some(abort.clone());

        let api = self.inner.api.clone();
        let task = tokio::spawn(async move { api.execute(prepared).await });

        Ok(CancelableRequest {
            promise: Cancelable {
                task,
                handle: CancelHandle {
                    canceled: Arc::new(AtomicBool::new(false)),
                    abort: abort.clone(),
                },
            },
            transport: TransportHandle { abort },
        })
    }
}

/// Result of a GET_WITH_XHR call
pub struct CancelableRequest {
    pub promise: Cancelable,
    pub transport: TransportHandle,
}

impl CancelableRequest {
    pub fn cancel(&self) {
        self.promise.cancel();
    }

    pub async fn result(self) -> Result<Value, ApiError> {
        self.promise.result().await
    }
}

/// Eventual result of a spawned request that can be canceled
pub struct Cancelable {
    task: JoinHandle<Result<Value, ApiError>>,
    handle: CancelHandle,
}

impl Cancelable {
    pub fn cancel(&self) {
        self.handle.cancel();
    }

    pub fn is_canceled(&self) -> bool {
        self.handle.is_canceled()
    }

    /// Cloneable handle for canceling from elsewhere while awaiting
    pub fn cancel_handle(&self) -> CancelHandle {
        self.handle.clone()
    }

    /// Once canceled this is always `ApiError::Canceled`, whatever the request did
    pub async fn result(self) -> Result<Value, ApiError> {
        let outcome = self.task.await;
        if self.handle.is_canceled() {
            return Err(ApiError::Canceled);
        }
        outcome?
    }
}

#[derive(Debug, Clone)]
pub struct CancelHandle {
    canceled: Arc<AtomicBool>,
    abort: CancellationToken,
}

impl CancelHandle {
    /// Mark the wrapper canceled and abort the transport
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
        self.abort.cancel();
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }
}

/// Aborts the in-flight exchange of a GET_WITH_XHR request
#[derive(Debug, Clone)]
pub struct TransportHandle {
    abort: CancellationToken,
}

impl TransportHandle {
    /// The request rejects as a cancelled status-0 response
    pub fn abort(&self) {
        self.abort.cancel();
    }

    pub fn is_aborted(&self) -> bool {
        self.abort.is_cancelled()
    }
}
