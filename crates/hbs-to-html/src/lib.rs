//! # hbs-to-html
//!
//! Render Handlebars template files to HTML strings.
//!
//! This crate is a thin layer over [`handlebars`]: it resolves templates by
//! name from a directory, optionally wraps them in a layout, and registers a
//! directory of partials before every render. Template syntax, helpers and
//! escaping are handled entirely by handlebars.
//!
//! ## Features
//!
//! - **Directory Conventions**: `render("index")` reads `<template_dir>/index.hbs`
//! - **Layouts**: The rendered template is injected into the layout as `{{{body}}}`
//! - **Partial Directories**: `card.hbs` and `footer.handlebars` become `{{> card}}` and `{{> footer}}`
//! - **Isolated Registries**: Each renderer owns its partials unless it opts into a shared registry
//! - **Environment Config**: Load a [`RendererConfig`] from `HBS_TO_HTML_*` variables
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hbs_to_html::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let renderer = TemplateRenderer::new(
//!         RendererConfig::new("views")
//!             .default_layout("views/layouts/main.hbs")
//!             .partial_dir("views/partials"),
//!     )?;
//!
//!     let context = ContextBuilder::new()
//!         .insert("title", "Welcome")
//!         .insert("year", 2024)
//!         .build();
//!
//!     let html = renderer.render(RenderRequest::new("index").context(context)).await?;
//!     println!("{}", html);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod context;
mod error;
pub mod partials;
mod renderer;

pub use config::{RendererConfig, DEFAULT_EXT_NAME, ENV_PREFIX};
pub use context::{to_context, Context, ContextBuilder, RenderRequest, BODY_KEY};
pub use error::{ConfigError, RenderError, Result};
pub use partials::{register_partials, PartialLoader, PartialNaming, PartialRegistry};
pub use renderer::TemplateRenderer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ContextBuilder, PartialNaming, PartialRegistry, RenderError, RenderRequest,
        RendererConfig, TemplateRenderer,
    };
}
