// api-factory/src/http/reqwest.rs
use super::{HttpError, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use async_trait::async_trait;

#[cfg(feature = "reqwest")]
pub struct ReqwestTransport {
    inner: reqwest::Client,
    bearer_token: Option<String>,
}

#[cfg(feature = "reqwest")]
impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
            bearer_token: None,
        }
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.bearer_token = Some(token);
        self
    }
}

#[cfg(feature = "reqwest")]
impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "reqwest")]
fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[cfg(feature = "reqwest")]
#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut req = self
            .inner
            .request(to_reqwest_method(request.method), &request.url);

        if let Some(token) = &self.bearer_token {
            req = req.bearer_auth(token);
        }

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            req = req.body(body);
        }

        let resp = req.send().await.map_err(|e| HttpError {
            status: None,
            message: e.to_string(),
        })?;

        let status = resp.status().as_u16();

        let body = resp
            .bytes()
            .await
            .map_err(|e| HttpError {
                status: Some(status),
                message: e.to_string(),
            })?
            .to_vec();

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_sends_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/card"))
            .and(header("content-type", "application/json"))
            .and(header("authorization", "Bearer secret"))
            .and(body_string(r#"{"name":"Orders"}"#))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":1}"#))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new().with_token("secret".to_string());
        let resp = transport
            .send(HttpRequest {
                method: HttpMethod::Post,
                url: format!("{}/api/card", server.uri()),
                headers: vec![("Content-Type".to_string(), "application/json".to_string())],
                body: Some(br#"{"name":"Orders"}"#.to_vec()),
            })
            .await
            .unwrap();

        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, br#"{"id":1}"#.to_vec());
    }

    #[tokio::test]
    async fn test_error_status_is_a_response() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/card/9"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let resp = ReqwestTransport::new()
            .send(HttpRequest {
                method: HttpMethod::Delete,
                url: format!("{}/api/card/9", server.uri()),
                headers: Vec::new(),
                body: None,
            })
            .await
            .unwrap();

        assert_eq!(resp.status, 500);
        assert_eq!(resp.body, b"boom".to_vec());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        let err = ReqwestTransport::new()
            .send(HttpRequest {
                method: HttpMethod::Get,
                url: "http://127.0.0.1:1/unreachable".to_string(),
                headers: Vec::new(),
                body: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.status, None);
    }
}
