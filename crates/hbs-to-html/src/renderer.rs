//! Template renderer with layout and partial support

use crate::config::RendererConfig;
use crate::context::{to_context, RenderRequest, BODY_KEY};
use crate::error::{RenderError, Result};
use crate::partials::{PartialLoader, PartialRegistry};
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

// Partial names never contain a dot, so these cannot collide with one.
const VIEW_TEMPLATE: &str = "view.hbs-to-html";
const LAYOUT_TEMPLATE: &str = "layout.hbs-to-html";

/// Renders named template files to HTML
///
/// Cloning is cheap; clones share the same partial registry.
///
/// # Example
///
/// ```rust,ignore
/// use hbs_to_html::{ContextBuilder, RenderRequest, RendererConfig, TemplateRenderer};
///
/// let renderer = TemplateRenderer::new(
///     RendererConfig::new("views")
///         .default_layout("views/layouts/main.hbs")
///         .partial_dir("views/partials"),
/// )?;
///
/// let html = renderer
///     .render(RenderRequest::new("index").context(ContextBuilder::new().insert("title", "Home")))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    config: RendererConfig,
    partials: PartialRegistry,
}

impl TemplateRenderer {
    /// Create a renderer
    ///
    /// The renderer owns a fresh partial registry, or the process-wide one
    /// when [`RendererConfig::shared_partials`] is set.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Validation`] if the template directory is empty.
    pub fn new(config: RendererConfig) -> Result<Self> {
        let partials = if config.shared_partials {
            PartialRegistry::global()
        } else {
            PartialRegistry::new()
        };
        Self::with_registry(config, partials)
    }

    /// Create a renderer that registers partials into `partials`
    pub fn with_registry(config: RendererConfig, partials: PartialRegistry) -> Result<Self> {
        if config.template_dir_path.as_os_str().is_empty() {
            return Err(RenderError::validation("template directory is required"));
        }
        Ok(Self { config, partials })
    }

    /// Get the configuration
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Get the partial registry
    pub fn partials(&self) -> &PartialRegistry {
        &self.partials
    }

    /// Render a template
    ///
    /// Partials are re-registered from the configured directory first, so
    /// both the template and the layout see them. With a layout configured,
    /// the template is rendered first and its output is bound to `body` in
    /// the layout's context, replacing any `body` the caller supplied.
    ///
    /// # Errors
    ///
    /// - [`RenderError::Validation`] if the request has no template name
    /// - [`RenderError::Io`] if a template, layout or partial cannot be read
    /// - [`RenderError::Compile`] if a template, layout or partial is malformed
    /// - [`RenderError::Render`] if rendering fails
    pub async fn render(&self, request: RenderRequest) -> Result<String> {
        request.validate()?;
        tracing::debug!(template = %request.template_name, "Rendering template");

        if let Some(dir) = self.config.partial_dir_path() {
            let loader = PartialLoader::new(self.partials.clone(), self.config.partial_naming);
            let count = loader.register_partials(dir).await?;
            tracing::debug!(dir = %dir.display(), count, "Registered partials");
        }

        let mut engine = self.engine().await?;

        let template_path = self.config.template_path(&request.template_name);
        let source = read_template(&template_path).await?;
        engine.register_template_string(VIEW_TEMPLATE, source)?;

        let payload = request.payload();
        tracing::trace!(keys = payload.len(), "Built context payload");

        let layout_path = match self.config.layout_path() {
            Some(path) => path,
            None => return Ok(engine.render(VIEW_TEMPLATE, &payload)?),
        };

        let layout = read_template(layout_path).await?;
        engine.register_template_string(LAYOUT_TEMPLATE, layout)?;

        let body = engine.render(VIEW_TEMPLATE, &payload)?;
        tracing::debug!(layout = %layout_path.display(), "Injecting template into layout");

        let mut layout_payload = payload;
        layout_payload.insert(BODY_KEY.to_string(), Value::String(body));
        Ok(engine.render(LAYOUT_TEMPLATE, &layout_payload)?)
    }

    /// Render a template with a serializable context
    ///
    /// `data` must serialize to a JSON object.
    pub async fn render_with<T: Serialize + ?Sized>(
        &self,
        template_name: &str,
        data: &T,
    ) -> Result<String> {
        let request = RenderRequest::new(template_name).context(to_context(data)?);
        self.render(request).await
    }

    /// A handlebars instance with every registered partial compiled in
    async fn engine(&self) -> Result<Handlebars<'static>> {
        let mut engine = Handlebars::new();
        for (name, source) in self.partials.snapshot().await {
            engine.register_partial(&name, source)?;
        }
        Ok(engine)
    }
}

async fn read_template(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| RenderError::io(path, e))
}
