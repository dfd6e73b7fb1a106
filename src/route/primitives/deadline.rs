use std::time::{Duration, Instant};

use crate::route::RouteError;

/// Point in time after which a search gives up.
///
/// `Deadline::none()` never expires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub const fn none() -> Self {
        Deadline(None)
    }

    pub fn after(duration: Duration) -> Self {
        Deadline(Instant::now().checked_add(duration))
    }

    pub const fn at(instant: Instant) -> Self {
        Deadline(Some(instant))
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.0.is_some_and(|instant| Instant::now() >= instant)
    }

    #[inline]
    pub fn check(&self) -> Result<(), RouteError> {
        if self.expired() {
            return Err(RouteError::DeadlineExceeded);
        }

        Ok(())
    }
}
