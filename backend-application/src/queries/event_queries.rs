use tracing::error;

use backend_domain::ports::EventRepository;
use backend_domain::Event;

use crate::{AppError, AppState};

/// The whole ledger in sequence order.
pub async fn list_events(state: &AppState) -> Result<Vec<Event>, AppError> {
    state.event_repo.find_all().await.map_err(|err| {
        error!("failed to list events: {}", err);
        AppError::Internal(err)
    })
}

#[cfg(test)]
mod tests {
    use backend_domain::EventType;

    use super::*;
    use crate::dtos::PostEventCommand;
    use crate::test_support::Fixture;

    #[tokio::test]
    async fn posted_event_is_listed_with_identical_fields() {
        let fx = Fixture::new().await;
        let user = fx.user().await;
        let scooter = fx.scooter().await;
        fx.occupancy
            .acquire(&scooter.id, &user, &scooter.version)
            .await
            .expect("acquire");
        let posted = fx
            .occupancy
            .post_event(PostEventCommand {
                scooter_id: scooter.id,
                user_id: user,
                event_type: EventType::Start,
                latitude: 48.8566,
                longitude: 2.3522,
            })
            .await
            .expect("post");

        let listed = list_events(&fx.state()).await.expect("list");
        assert_eq!(listed, vec![posted]);
    }
}
