use crate::database::KeyValueStore;
use crate::error::StorageError;
use crate::utils::format_visit_date;
use chrono::{Local, NaiveDate};
use tracing::debug;

pub const LAST_VISIT_DATE_KEY: &str = "lotto_last_visit_date";

pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local calendar of the machine running the client.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

pub fn today_key(clock: &impl Clock) -> String {
    format_visit_date(clock.today())
}

/// Tracks whether the client has already been opened today.
pub struct VisitTracker<S, C> {
    store: S,
    clock: C,
}

impl<S, C> VisitTracker<S, C>
where
    S: KeyValueStore,
    C: Clock,
{
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn is_first_visit_today(&self) -> Result<bool, StorageError> {
        let last_visit = self.store.get_item(LAST_VISIT_DATE_KEY)?;
        let today = today_key(&self.clock);
        Ok(last_visit.as_deref() != Some(today.as_str()))
    }

    pub fn update_last_visit_date(&self) -> Result<(), StorageError> {
        let today = today_key(&self.clock);
        self.store.set_item(LAST_VISIT_DATE_KEY, &today)
    }

    /// Records today's date only when this is the first visit of the day.
    pub fn check_and_update_first_visit(&self) -> Result<bool, StorageError> {
        let is_first = self.is_first_visit_today()?;
        if is_first {
            self.update_last_visit_date()?;
        }
        debug!(is_first, "visit checked");
        Ok(is_first)
    }
}
