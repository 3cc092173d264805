use std::sync::Arc;

use crate::config::UnfilteredResultTypes;
use crate::repositories::Catalog;

/// Shared, read-only state handed to every request.
pub(crate) struct AppState {
    pub catalog: Arc<dyn Catalog>,
    pub unfiltered_result_types: UnfilteredResultTypes,
}
