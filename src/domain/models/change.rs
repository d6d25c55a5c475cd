use serde::{Deserialize, Serialize};
use serde_json::Value;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::warn;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Slots,
    Bookings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Insert => "INSERT",
            ChangeKind::Update => "UPDATE",
            ChangeKind::Delete => "DELETE",
        }
    }
}

impl FromStr for Table {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slots" => Ok(Table::Slots),
            "bookings" => Ok(Table::Bookings),
            other => Err(format!("unknown table '{}'", other)),
        }
    }
}

/// One row-level change, published after the store has confirmed the write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
    pub record: Value,
    pub old_record: Option<Value>,
    pub committed_at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn insert<T: Serialize>(table: Table, row: &T) -> Self {
        Self::build(table, ChangeKind::Insert, row, None)
    }

    pub fn update<T: Serialize>(table: Table, row: &T, old: Option<&T>) -> Self {
        Self::build(table, ChangeKind::Update, row, old)
    }

    fn build<T: Serialize>(table: Table, kind: ChangeKind, row: &T, old: Option<&T>) -> Self {
        Self {
            table,
            kind,
            record: serde_json::to_value(row).unwrap_or_default(),
            old_record: old.map(|o| serde_json::to_value(o).unwrap_or_default()),
            committed_at: Utc::now(),
        }
    }
}

pub const OWNER_COLUMN: &str = "user_id";

/// Table scope plus an optional `column = value` match, e.g. bookings where `slot_id = X`.
/// `owner` additionally pins every row to one `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeFilter {
    pub table: Table,
    pub column: Option<String>,
    pub value: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
}

impl ChangeFilter {
    pub fn table(table: Table) -> Self {
        Self { table, column: None, value: None, owner: None }
    }

    pub fn column_eq(table: Table, column: impl Into<String>, value: impl Into<String>) -> Self {
        Self { table, column: Some(column.into()), value: Some(value.into()), owner: None }
    }

    pub fn owned_by(mut self, user_id: impl Into<String>) -> Self {
        self.owner = Some(user_id.into());
        self
    }

    pub fn matches(&self, event: &ChangeEvent) -> bool {
        if event.table != self.table {
            return false;
        }
        if let Some(owner) = &self.owner {
            if !column_equals(&event.record, OWNER_COLUMN, owner) {
                return false;
            }
        }
        let (Some(column), Some(expected)) = (&self.column, &self.value) else {
            return true;
        };
        // An update that moves a row out of the filter is still reported.
        std::iter::once(&event.record)
            .chain(event.old_record.as_ref())
            .any(|row| column_equals(row, column, expected))
    }
}

fn column_equals(row: &Value, column: &str, expected: &str) -> bool {
    match row.get(column) {
        Some(Value::String(s)) => s == expected,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == expected,
    }
}

/// Live subscription to the change feed. Dropping it unsubscribes.
pub struct ChangeSubscription {
    receiver: broadcast::Receiver<ChangeEvent>,
    filter: ChangeFilter,
}

impl ChangeSubscription {
    pub fn new(receiver: broadcast::Receiver<ChangeEvent>, filter: ChangeFilter) -> Self {
        Self { receiver, filter }
    }

    pub fn filter(&self) -> &ChangeFilter {
        &self.filter
    }

    /// Next matching event; `None` once the feed is closed.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Change subscriber lagged, {} events skipped", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn booking_event(slot_id: &str, old_slot: Option<&str>) -> ChangeEvent {
        ChangeEvent {
            table: Table::Bookings,
            kind: ChangeKind::Update,
            record: json!({ "id": "b1", "slot_id": slot_id, "user_id": "u1", "amount": 600 }),
            old_record: old_slot.map(|s| json!({ "id": "b1", "slot_id": s, "user_id": "u1", "amount": 600 })),
            committed_at: Utc::now(),
        }
    }

    #[test]
    fn test_filter_by_table_only() {
        let filter = ChangeFilter::table(Table::Bookings);
        assert!(filter.matches(&booking_event("s1", None)));
        assert!(!ChangeFilter::table(Table::Slots).matches(&booking_event("s1", None)));
    }

    #[test]
    fn test_filter_by_column_value() {
        let filter = ChangeFilter::column_eq(Table::Bookings, "slot_id", "s1");
        assert!(filter.matches(&booking_event("s1", None)));
        assert!(!filter.matches(&booking_event("s2", None)));
        assert!(filter.matches(&booking_event("s2", Some("s1"))));
    }

    #[test]
    fn test_filter_compares_non_string_columns() {
        let filter = ChangeFilter::column_eq(Table::Bookings, "amount", "600");
        assert!(filter.matches(&booking_event("s1", None)));
        let missing = ChangeFilter::column_eq(Table::Bookings, "phone", "9876543210");
        assert!(!missing.matches(&booking_event("s1", None)));
    }

    #[test]
    fn test_owner_scope_hides_other_users_rows() {
        let mine = ChangeFilter::table(Table::Bookings).owned_by("u1");
        assert!(mine.matches(&booking_event("s1", None)));

        let theirs = ChangeFilter::table(Table::Bookings).owned_by("u2");
        assert!(!theirs.matches(&booking_event("s1", None)));

        let by_slot = ChangeFilter::column_eq(Table::Bookings, "slot_id", "s1").owned_by("u2");
        assert!(!by_slot.matches(&booking_event("s1", None)));
    }

    #[tokio::test]
    async fn test_subscription_skips_non_matching_events() {
        let (tx, rx) = broadcast::channel(8);
        let mut sub = ChangeSubscription::new(rx, ChangeFilter::column_eq(Table::Bookings, "slot_id", "s2"));

        tx.send(booking_event("s1", None)).unwrap();
        tx.send(booking_event("s2", None)).unwrap();
        drop(tx);

        let event = sub.next().await.expect("matching event");
        assert_eq!(event.record["slot_id"], "s2");
        assert!(sub.next().await.is_none());
    }
}
