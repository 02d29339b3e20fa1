use serde_json::Value;

/// Output of a renderer, ready to be written into a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content_type: &'static str,
    pub body: String,
}

/// Renderer trait - turns a named view and its context into a response body.
pub trait Renderer: Send + Sync {
    fn render(&self, view: &str, context: &Value) -> Result<Rendered, RenderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Unknown view: {0}")]
    UnknownView(String),

    #[error("Rendering failed: {0}")]
    Failed(String),
}
