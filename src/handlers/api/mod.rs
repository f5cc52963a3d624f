pub mod all;
pub mod history;
pub mod latest;
pub mod status;

pub use all::all_get;
pub use history::history_get;
pub use latest::latest_get;
pub use status::status_get;

use crate::error::ApiError;

/// Unmatched /api/* paths get the JSON failure envelope rather than a static 404
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
