pub mod client;
pub mod dispatch;
pub mod result;

pub use client::{decode_response, AnalysisError, AnalysisService, DEFAULT_ENDPOINT};
pub use dispatch::AnalysisDispatcher;
pub use result::{AnalysisResult, AnnotatedMedia, FrameFinding};
