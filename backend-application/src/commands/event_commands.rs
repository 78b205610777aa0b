use tracing::info;

use backend_domain::ports::EventRepository;
use backend_domain::EventId;

use crate::{AppError, AppState};

/// Administrative removal from the ledger. Removed sequence numbers are
/// never handed out again.
pub async fn delete_events(state: &AppState, ids: &[EventId]) -> Result<u64, AppError> {
    let removed = state
        .event_repo
        .delete_by_ids(ids)
        .await
        .map_err(AppError::Internal)?;
    info!("deleted {} of {} requested events", removed, ids.len());
    Ok(removed)
}
