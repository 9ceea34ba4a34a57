mod pipeline;
mod submission;

pub use pipeline::{ConversionPipeline, PipelineError};
pub use submission::{ConversionType, SubmissionService};
