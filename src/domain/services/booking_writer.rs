use std::sync::Arc;
use chrono::Utc;
use chrono_tz::Tz;
use tracing::{debug, error, info, warn};

use crate::domain::models::{
    auth::Session,
    booking::{Booking, BookingStatus, NewBookingParams, RequestedStatus},
    change::{ChangeEvent, Table},
};
use crate::domain::ports::{BookingRepository, ChangeFeed, SlotRepository};
use crate::domain::services::reconciler::{AvailabilityReconciler, Reconciled};
use crate::error::AppError;

pub const MIN_PHONE_DIGITS: usize = 10;

pub struct NewBooking {
    pub slot_id: String,
    pub full_name: String,
    pub phone: String,
}

/// Trimmed name and phone, or the first validation failure.
pub fn validate_contact(full_name: &str, phone: &str) -> Result<(String, String), AppError> {
    let full_name = full_name.trim();
    let phone = phone.trim();

    if full_name.is_empty() || phone.is_empty() {
        return Err(AppError::Validation("Name and phone are required".into()));
    }
    if phone.chars().filter(|c| c.is_ascii_digit()).count() < MIN_PHONE_DIGITS {
        return Err(AppError::Validation("Please enter a valid phone number".into()));
    }

    Ok((full_name.to_string(), phone.to_string()))
}

pub struct BookingWriter {
    slot_repo: Arc<dyn SlotRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    reconciler: Arc<AvailabilityReconciler>,
    change_feed: Arc<dyn ChangeFeed>,
    timezone: Tz,
}

impl BookingWriter {
    pub fn new(
        slot_repo: Arc<dyn SlotRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        reconciler: Arc<AvailabilityReconciler>,
        change_feed: Arc<dyn ChangeFeed>,
        timezone: Tz,
    ) -> Self {
        Self { slot_repo, booking_repo, reconciler, change_feed, timezone }
    }

    pub async fn create_booking(&self, session: &Session, request: NewBooking) -> Result<Booking, AppError> {
        let (full_name, phone) = validate_contact(&request.full_name, &request.phone)?;

        let slot = self.slot_repo.find_by_id(&request.slot_id).await?
            .ok_or(AppError::NotFound("Slot not found".into()))?;

        if !slot.available {
            warn!("Booking rejected: slot {} is not available", slot.id);
            return Err(AppError::Conflict("Slot is not available".into()));
        }

        let today = Utc::now().with_timezone(&self.timezone).date_naive();
        if slot.date < today {
            return Err(AppError::Validation("Cannot book a slot in the past".into()));
        }

        // A confirmed holder on a free-looking slot means an earlier flip was lost.
        if let Some(holder) = self.booking_repo.find_confirmed_by_slot(&slot.id).await? {
            warn!("Slot {} looks free but booking {} holds it, taking it again", slot.id, holder.id);
            if let Err(e) = self.reconciler.reconcile(&holder, None).await {
                error!("Could not re-take slot {} for booking {}: {:?}", slot.id, holder.id, e);
            }
            return Err(AppError::Conflict("Slot is not available".into()));
        }

        let booking = Booking::for_slot(&slot, NewBookingParams {
            user_id: session.user_id.clone(),
            full_name,
            phone,
        });

        let created = self.booking_repo.create(&booking).await?;
        self.change_feed.publish(ChangeEvent::insert(Table::Bookings, &created));
        info!("Booking {} stored for slot {}", created.id, slot.id);

        match self.reconciler.reconcile(&created, None).await {
            Ok(Reconciled::AlreadyTaken) => {
                warn!("Slot {} was taken while booking {} was written, cancelling it", slot.id, created.id);
                let cancelled = self.booking_repo.update_status(&created.id, BookingStatus::Cancelled).await?;
                self.change_feed.publish(ChangeEvent::update(Table::Bookings, &cancelled, Some(&created)));
                Err(AppError::Conflict("Slot is not available".into()))
            }
            Ok(_) => Ok(created),
            Err(e) => {
                error!("Booking {} stored but slot {} was not marked unavailable: {:?}", created.id, slot.id, e);
                Ok(created)
            }
        }
    }

    /// Admins may set any status; owners may only cancel their own booking.
    pub async fn update_status(&self, session: &Session, booking_id: &str, requested: RequestedStatus) -> Result<Booking, AppError> {
        let booking = self.booking_repo.find_by_id(booking_id).await?
            .ok_or(AppError::NotFound("Booking not found".into()))?;

        if !session.is_admin() {
            if booking.user_id != session.user_id {
                return Err(AppError::NotFound("Booking not found".into()));
            }
            if requested != RequestedStatus::Cancelled {
                return Err(AppError::Forbidden("Only cancellation is allowed".into()));
            }
        }

        let Some(target) = requested.persisted() else {
            info!("Booking {} marked completed for display only", booking.id);
            return Ok(booking);
        };

        let previous = booking.status();
        if previous == Some(target) {
            return Ok(booking);
        }

        if target == BookingStatus::Confirmed {
            self.reconfirm(booking, previous).await
        } else {
            let updated = self.booking_repo.update_status(&booking.id, target).await?;
            self.change_feed.publish(ChangeEvent::update(Table::Bookings, &updated, Some(&booking)));
            info!("Booking {} set to {}", updated.id, target);

            match self.reconciler.reconcile(&updated, previous).await {
                Ok(Reconciled::Released(slot)) => debug!("Slot {} is open again", slot.id),
                Ok(_) => {}
                Err(e) => error!("Booking {} cancelled but its slot was not released: {:?}", updated.id, e),
            }
            Ok(updated)
        }
    }

    async fn reconfirm(&self, booking: Booking, previous: Option<BookingStatus>) -> Result<Booking, AppError> {
        let mut prospective = booking.clone();
        prospective.status = BookingStatus::Confirmed.as_str().to_string();

        let claimed = match self.reconciler.reconcile(&prospective, previous).await? {
            Reconciled::AlreadyTaken => {
                return Err(AppError::Conflict("Slot is no longer available".into()));
            }
            Reconciled::Claimed(slot) => Some(slot),
            _ => None,
        };

        match self.booking_repo.update_status(&booking.id, BookingStatus::Confirmed).await {
            Ok(updated) => {
                self.change_feed.publish(ChangeEvent::update(Table::Bookings, &updated, Some(&booking)));
                info!("Booking {} re-confirmed", updated.id);
                Ok(updated)
            }
            Err(e) => {
                if let Some(slot) = claimed {
                    warn!("Re-confirming booking {} failed, releasing slot {}", booking.id, slot.id);
                    if let Err(release_err) = self.slot_repo.set_available(&slot.id, true).await {
                        error!("Slot {} left unavailable after failed re-confirm: {:?}", slot.id, release_err);
                    }
                }
                Err(e)
            }
        }
    }
}
