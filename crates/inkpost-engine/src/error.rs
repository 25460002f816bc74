use thiserror::Error;

use crate::options::EngineKind;

/// Failures inside a conversion engine. These never reach callers of
/// [`Converter::convert`](crate::Converter::convert); they are logged and the fallback path runs.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("{engine} engine panicked: {message}")]
    EnginePanicked { engine: EngineKind, message: String },
}

impl ConvertError {
    pub(crate) fn from_panic(engine: EngineKind, payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        ConvertError::EnginePanicked { engine, message }
    }
}
