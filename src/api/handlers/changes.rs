use axum::{
    extract::{State, Query},
    response::sse::{Event, KeepAlive, Sse},
};
use crate::state::AppState;
use crate::api::{dtos::requests::ChangesQuery, extractors::auth::AuthUser};
use crate::domain::models::change::{ChangeFilter, Table, OWNER_COLUMN};
use crate::error::AppError;
use futures::stream::{self, Stream};
use std::{convert::Infallible, sync::Arc};
use tracing::{info, warn};

/// Server-sent stream of row changes. Closing the connection drops the subscription.
/// Non-admins only ever see their own bookings.
pub async fn stream_changes(
    AuthUser(session): AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChangesQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let table: Table = params.table.parse().map_err(AppError::Validation)?;

    let mut filter = match (params.column, params.value) {
        (Some(column), Some(value)) => ChangeFilter::column_eq(table, column, value),
        (None, None) => ChangeFilter::table(table),
        _ => return Err(AppError::Validation("column and value must be given together".into())),
    };

    if table == Table::Bookings && !session.is_admin() {
        if filter.column.as_deref() == Some(OWNER_COLUMN) && filter.value.as_deref() != Some(session.user_id.as_str()) {
            warn!("User {} asked for another user's booking changes", session.user_id);
            return Err(AppError::Forbidden("You can only follow your own bookings".into()));
        }
        filter = filter.owned_by(session.user_id.clone());
    }

    info!("New change subscriber {} on {:?}", session.user_id, filter);
    let subscription = state.change_feed.subscribe(filter);

    let events = stream::unfold(subscription, |mut subscription| async move {
        let change = subscription.next().await?;
        let event = Event::default()
            .event(change.kind.as_str())
            .json_data(&change)
            .unwrap_or_else(|e| {
                warn!("Failed to encode change event: {:?}", e);
                Event::default().comment("encoding failed")
            });
        Some((Ok::<_, Infallible>(event), subscription))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
