use chrono::{DateTime, Duration, SubsecRound, Utc};

/// A persisted entity carrying an identifier and write timestamps.
///
/// Repositories own the timestamps: `created_at` is fixed on first insert and
/// `updated_at` moves forward on every save.
pub trait Record {
    type Id: Copy + Send + Sync;

    fn id(&self) -> Self::Id;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
    fn set_timestamps(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>);
}

/// Apply write-path timestamps to `record` before it is stored.
///
/// `stored` is the currently persisted version, if any. Timestamps are kept at
/// microsecond precision so every backend stores exactly what it was given.
pub fn stamp_for_write<T: Record>(record: &mut T, stored: Option<&T>, now: DateTime<Utc>) {
    let now = now.trunc_subsecs(6);
    match stored {
        Some(stored) => {
            let floor = stored.updated_at() + Duration::microseconds(1);
            record.set_timestamps(stored.created_at(), now.max(floor));
        }
        None => record.set_timestamps(now, now),
    }
}
