use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::models::{
    booking::{Booking, BookingStatus},
    change::{ChangeEvent, Table},
    slot::Slot,
};
use crate::domain::ports::{ChangeFeed, SlotRepository};
use crate::error::AppError;

#[derive(Debug)]
pub enum Reconciled {
    /// Slot flipped to unavailable.
    Claimed(Slot),
    /// Slot flipped back to available.
    Released(Slot),
    /// The slot was already taken, nothing written.
    AlreadyTaken,
    Unchanged,
}

/// Keeps `slots.available` in step with booking status. Slot state never feeds back into
/// booking status.
pub struct AvailabilityReconciler {
    slot_repo: Arc<dyn SlotRepository>,
    change_feed: Arc<dyn ChangeFeed>,
}

impl AvailabilityReconciler {
    pub fn new(slot_repo: Arc<dyn SlotRepository>, change_feed: Arc<dyn ChangeFeed>) -> Self {
        Self { slot_repo, change_feed }
    }

    /// Applies the slot side of `booking` moving from `previous` to its current status.
    /// `previous` is `None` for a freshly created booking.
    pub async fn reconcile(&self, booking: &Booking, previous: Option<BookingStatus>) -> Result<Reconciled, AppError> {
        let Some(slot_id) = booking.slot_id.as_deref() else {
            debug!("Booking {} has no slot, nothing to reconcile", booking.id);
            return Ok(Reconciled::Unchanged);
        };

        match (previous, booking.status()) {
            (None | Some(BookingStatus::Cancelled), Some(BookingStatus::Confirmed)) => {
                match self.slot_repo.claim(slot_id).await? {
                    Some(slot) => {
                        let mut before = slot.clone();
                        before.available = true;
                        self.change_feed.publish(ChangeEvent::update(Table::Slots, &slot, Some(&before)));
                        info!("Slot {} taken by booking {}", slot_id, booking.id);
                        Ok(Reconciled::Claimed(slot))
                    }
                    None => Ok(Reconciled::AlreadyTaken),
                }
            }
            (Some(BookingStatus::Confirmed), Some(BookingStatus::Cancelled)) => {
                match self.slot_repo.set_available(slot_id, true).await? {
                    Some(slot) => {
                        let mut before = slot.clone();
                        before.available = false;
                        self.change_feed.publish(ChangeEvent::update(Table::Slots, &slot, Some(&before)));
                        info!("Slot {} released by booking {}", slot_id, booking.id);
                        Ok(Reconciled::Released(slot))
                    }
                    None => Ok(Reconciled::Unchanged),
                }
            }
            _ => Ok(Reconciled::Unchanged),
        }
    }
}
