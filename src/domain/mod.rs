mod artifact_key;
mod conversion;
mod conversion_status;
mod title;

pub use artifact_key::ArtifactKey;
pub use conversion::{Conversion, ConversionId, SessionId};
pub use conversion_status::ConversionStatus;
pub use title::sanitize_title;
