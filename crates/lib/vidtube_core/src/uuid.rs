// Identifiers for accounts and videos are generated app-side as UUIDv7 so
// that both storage backends hand out the same, time-sortable ids.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

/// Generate a random UUIDv4, used for token ids.
pub fn uuidv4() -> Uuid {
    Uuid::new_v4()
}
