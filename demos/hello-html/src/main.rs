//! Demo server rendering `views/index.hbs` inside a layout with partials
//!
//! Run with: cargo run -p hello-html
//!
//! Then visit: http://127.0.0.1:4000
//!
//! Set `HBS_TO_HTML_TEMPLATE_DIR_PATH` (and friends) to serve other views,
//! and `HELLO_HTML_ADDR` to change the listen address.

mod server;
mod view;

use hbs_to_html::{RendererConfig, TemplateRenderer};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_ADDR: &str = "127.0.0.1:4000";

fn bundled_config() -> RendererConfig {
    let views = Path::new(env!("CARGO_MANIFEST_DIR")).join("views");
    RendererConfig::new(&views)
        .default_layout(views.join("layouts").join("main.hbs"))
        .partial_dir(views.join("partials"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,hbs_to_html=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = if std::env::var_os("HBS_TO_HTML_TEMPLATE_DIR_PATH").is_some() {
        RendererConfig::from_env()?
    } else {
        bundled_config()
    };
    let renderer = TemplateRenderer::new(config)?;

    let addr = std::env::var("HELLO_HTML_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    server::run(&addr, renderer).await
}
