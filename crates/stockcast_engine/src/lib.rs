pub mod data_point;
pub mod error;
pub mod forecast;
pub mod normalizer;
pub mod pipeline;
pub mod presentation;
pub mod signal;
pub mod symbol;

pub use error::PipelineError;
pub use pipeline::{Analysis, Params};
pub use stockcast_shared_models::Recommendation;
pub use symbol::Symbol;
