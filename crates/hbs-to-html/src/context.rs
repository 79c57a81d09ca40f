//! Render requests and context building

use crate::error::{RenderError, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Key the inner template's output is bound to when rendering a layout
pub const BODY_KEY: &str = "body";

/// Template context: a JSON object keyed by field name
pub type Context = Map<String, Value>;

/// Serialize `data` into a context object
///
/// Fails unless `data` serializes to a JSON object.
pub fn to_context<T: Serialize + ?Sized>(data: &T) -> Result<Context> {
    match serde_json::to_value(data).map_err(|e| RenderError::serialization(e.to_string()))? {
        Value::Object(map) => Ok(map),
        other => Err(RenderError::serialization(format!(
            "context must serialize to an object, got {}",
            value_kind(&other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Request to render one named template
///
/// # Example
///
/// ```rust
/// use hbs_to_html::{ContextBuilder, RenderRequest};
///
/// let request = RenderRequest::new("index")
///     .context(ContextBuilder::new().insert("title", "Home").build());
///
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderRequest {
    /// Template name, resolved to `<template_dir>/<name>.<ext>`
    pub template_name: String,
    /// Values made available to the template
    pub context: Option<Context>,
}

impl RenderRequest {
    /// Create a request for the given template with no context
    pub fn new(template_name: impl Into<String>) -> Self {
        Self {
            template_name: template_name.into(),
            context: None,
        }
    }

    /// Set the context
    pub fn context(mut self, context: impl Into<Context>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the context from a serializable value
    pub fn with_data<T: Serialize + ?Sized>(self, data: &T) -> Result<Self> {
        Ok(self.context(to_context(data)?))
    }

    /// True when neither a template name nor a context was given
    pub fn is_empty(&self) -> bool {
        self.template_name.is_empty() && self.context.is_none()
    }

    /// Reject requests that cannot name a template
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() || self.template_name.is_empty() {
            return Err(RenderError::validation("template name is required"));
        }
        Ok(())
    }

    /// A fresh context with the request context shallow-merged in
    pub fn payload(&self) -> Context {
        let mut payload = Context::new();
        if let Some(context) = &self.context {
            payload.extend(context.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        payload
    }
}

/// Builder for constructing template context
///
/// This provides a fluent API for building template context without
/// needing to create a struct for simple cases.
///
/// # Example
///
/// ```rust
/// use hbs_to_html::ContextBuilder;
///
/// let is_admin = false;
/// let context = ContextBuilder::new()
///     .insert("name", "Alice")
///     .insert("age", 30)
///     .insert_if("admin", true, |_| is_admin)
///     .build();
///
/// assert!(context.contains_key("name"));
/// assert!(!context.contains_key("admin"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    context: Context,
}

impl ContextBuilder {
    /// Create a new context builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value into the context
    pub fn insert(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Insert any serializable value
    pub fn insert_serialized<T: Serialize + ?Sized>(
        mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self> {
        let value =
            serde_json::to_value(value).map_err(|e| RenderError::serialization(e.to_string()))?;
        self.context.insert(key.into(), value);
        Ok(self)
    }

    /// Insert a value if a condition is met
    pub fn insert_if<V, F>(self, key: impl Into<String>, value: V, condition: F) -> Self
    where
        V: Into<Value>,
        F: FnOnce(&V) -> bool,
    {
        if condition(&value) {
            self.insert(key, value)
        } else {
            self
        }
    }

    /// Insert a value if it's Some
    pub fn insert_some<V: Into<Value>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.insert(key, v),
            None => self,
        }
    }

    /// Extend with the fields of a serializable struct
    pub fn extend<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.context.extend(to_context(value)?);
        Ok(self)
    }

    /// Build the context
    pub fn build(self) -> Context {
        self.context
    }
}

impl From<ContextBuilder> for Context {
    fn from(builder: ContextBuilder) -> Self {
        builder.build()
    }
}
