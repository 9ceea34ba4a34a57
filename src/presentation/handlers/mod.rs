mod conversions;
mod convert;
mod download;
mod health;
mod transcript;

use serde::Serialize;

pub use conversions::{conversion_status_handler, session_conversions_handler};
pub use convert::convert_handler;
pub use download::download_handler;
pub use health::health_handler;
pub use transcript::transcript_handler;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
