// Errors surfaced by the renderers. Anything a browser API throws is folded
// into `Host` so the core never has to know about `JsValue`.

use wasm_bindgen::JsValue;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// The canvas refused to hand out a 2d drawing context.
    #[error("drawing context unavailable: {0}")]
    ContextUnavailable(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// `start` was called on an animator that has already been torn down.
    #[error("renderer has already been destroyed")]
    AlreadyDestroyed,
    #[error("host error: {0}")]
    Host(String),
}

impl From<JsValue> for RenderError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        RenderError::Host(message)
    }
}

impl From<RenderError> for JsValue {
    fn from(err: RenderError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failure() {
        let err = RenderError::ContextUnavailable("2d".to_owned());
        assert_eq!(err.to_string(), "drawing context unavailable: 2d");
        assert_eq!(
            RenderError::AlreadyDestroyed.to_string(),
            "renderer has already been destroyed"
        );
    }

    #[test]
    fn converts_into_a_boxed_std_error() {
        let err: Box<dyn std::error::Error> =
            Box::new(RenderError::InvalidConfig("damping must be in (0, 1]".to_owned()));
        assert_eq!(
            err.to_string(),
            "invalid configuration: damping must be in (0, 1]"
        );
        assert!(err.source().is_none());
    }
}
