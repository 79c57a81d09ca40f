//! HTML response type

use bytes::Bytes;
use hbs_to_html::RenderError;
use http::{header, Response, StatusCode};
use http_body_util::Full;

const ERROR_PAGE: &str = "<!DOCTYPE html><html><head><title>Error</title></head>\
    <body><h1>500 Internal Server Error</h1>\
    <p>Template rendering failed</p></body></html>";

/// The outcome of a render, turned into an HTTP response
pub struct View {
    content: Result<String, RenderError>,
    status: StatusCode,
}

impl View {
    /// Wrap a render result
    pub fn new(content: Result<String, RenderError>) -> Self {
        Self {
            content,
            status: StatusCode::OK,
        }
    }

    /// Set the status used when rendering succeeded
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Build the response, logging render failures
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let (status, body) = match self.content {
            Ok(html) => (self.status, Bytes::from(html)),
            Err(err) => {
                tracing::error!(error = %err, "Template rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Bytes::from_static(ERROR_PAGE.as_bytes()),
                )
            }
        };

        let mut response = Response::new(Full::new(body));
        *response.status_mut() = status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("text/html; charset=utf-8"),
        );
        response
    }
}
