//! HTTP server loop

use crate::view::View;
use bytes::Bytes;
use chrono::Datelike;
use hbs_to_html::{ContextBuilder, RenderRequest, TemplateRenderer};
use http::{Method, StatusCode};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Serve the demo site until the process is stopped
pub async fn run(
    addr: &str,
    renderer: TemplateRenderer,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr: SocketAddr = addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    let renderer = Arc::new(renderer);

    info!("Server running on http://{}", addr);

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let renderer = renderer.clone();

        tokio::spawn(async move {
            let service = service_fn(move |req: hyper::Request<Incoming>| {
                let renderer = renderer.clone();
                async move { Ok::<_, Infallible>(handle_request(&renderer, req).await) }
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                error!("Connection error: {}", err);
            }
        });
    }
}

async fn handle_request(
    renderer: &TemplateRenderer,
    req: hyper::Request<Incoming>,
) -> hyper::Response<Full<Bytes>> {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match (&method, path.as_str()) {
        (&Method::GET, "/") => View::new(renderer.render(index_request()).await).into_response(),
        _ => View::new(Ok("<h1>404 Not Found</h1>".to_string()))
            .status(StatusCode::NOT_FOUND)
            .into_response(),
    };

    info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        "Request completed"
    );
    response
}

fn index_request() -> RenderRequest {
    RenderRequest::new("index").context(
        ContextBuilder::new()
            .insert("year", chrono::Local::now().year())
            .insert("title", "Testing package"),
    )
}
