// api-factory/src/method.rs
use crate::http::HttpMethod;
use std::fmt;

/// The verbs a request method can be created for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    /// GET whose call hands back a cancelable wrapper and a transport handle
    GetWithXhr,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Whether remaining data travels as a JSON body rather than a query string
    pub fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    pub fn http_method(self) -> HttpMethod {
        match self {
            Self::Get | Self::GetWithXhr => HttpMethod::Get,
            Self::Post => HttpMethod::Post,
            Self::Put => HttpMethod::Put,
            Self::Delete => HttpMethod::Delete,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::GetWithXhr => "GET_WITH_XHR",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
