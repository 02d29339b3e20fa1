//! Response renderers.

use serde_json::{Value, json};

use quill_core::ports::{RenderError, Rendered, Renderer};

/// Views the blog handlers render.
pub const VIEWS: [&str; 4] = [
    "blog/post/list",
    "blog/post/detail",
    "blog/post/share",
    "blog/post/comment",
];

/// Renders a view as a JSON document `{"view": ..., "context": ...}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, view: &str, context: &Value) -> Result<Rendered, RenderError> {
        if !VIEWS.contains(&view) {
            return Err(RenderError::UnknownView(view.to_string()));
        }

        let body = serde_json::to_string(&json!({ "view": view, "context": context }))
            .map_err(|e| RenderError::Failed(e.to_string()))?;

        Ok(Rendered {
            content_type: "application/json",
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_wraps_context() {
        let rendered = JsonRenderer::new()
            .render("blog/post/detail", &json!({ "post": { "title": "Hello" } }))
            .unwrap();

        assert_eq!(rendered.content_type, "application/json");
        let body: Value = serde_json::from_str(&rendered.body).unwrap();
        assert_eq!(body["view"], "blog/post/detail");
        assert_eq!(body["context"]["post"]["title"], "Hello");
    }

    #[test]
    fn test_unknown_view() {
        let result = JsonRenderer::new().render("blog/post/archive", &Value::Null);
        assert!(matches!(result, Err(RenderError::UnknownView(_))));
    }
}
