use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

/// Lifecycle of the single request a flow may have outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestState {
    /// Nothing has been attempted, or the last attempt was abandoned
    #[default]
    Idle,
    /// A request has been issued and has not settled
    InFlight,
    /// The last request completed successfully
    Succeeded,
    /// The last request failed (HTTP status, transport or decode)
    Failed,
}

impl RequestState {
    pub fn is_in_flight(self) -> bool {
        matches!(self, RequestState::InFlight)
    }
}

/// Holds a flow's [`RequestState`] and hands out at most one in-flight claim.
#[derive(Debug, Default)]
pub struct RequestSlot {
    state: Mutex<RequestState>,
}

impl RequestSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RequestState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_in_flight(&self) -> bool {
        self.state().is_in_flight()
    }

    /// Move to `InFlight`, or return `None` if a request is already outstanding.
    ///
    /// Check and transition happen under one lock, so two concurrent callers
    /// can never both get a claim.
    pub fn try_begin(&self) -> Option<InFlight<'_>> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.is_in_flight() {
            return None;
        }
        *state = RequestState::InFlight;
        Some(InFlight {
            slot: self,
            settled: false,
        })
    }

    /// Return a settled slot to `Idle`. An outstanding request keeps its claim.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.is_in_flight() {
            *state = RequestState::Idle;
        }
    }

    fn settle(&self, next: RequestState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

/// Claim on a [`RequestSlot`] for the duration of one request.
///
/// Settling records the outcome. Dropping an unsettled claim (the caller's
/// future was dropped, or a panic unwound through it) returns the slot to
/// `Idle`, so the slot is never left in flight.
#[must_use = "dropping the claim immediately releases the slot"]
pub struct InFlight<'a> {
    slot: &'a RequestSlot,
    settled: bool,
}

impl InFlight<'_> {
    pub fn succeed(mut self) {
        self.settled = true;
        self.slot.settle(RequestState::Succeeded);
    }

    pub fn fail(mut self) {
        self.settled = true;
        self.slot.settle(RequestState::Failed);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.slot.settle(RequestState::Idle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_claim_at_a_time() {
        let slot = RequestSlot::new();
        let claim = slot.try_begin().expect("idle slot should be claimable");
        assert!(slot.is_in_flight());
        assert!(slot.try_begin().is_none());

        claim.succeed();
        assert_eq!(slot.state(), RequestState::Succeeded);
        assert!(slot.try_begin().is_some());
    }

    #[test]
    fn failed_slot_accepts_next_attempt() {
        let slot = RequestSlot::new();
        slot.try_begin().unwrap().fail();
        assert_eq!(slot.state(), RequestState::Failed);

        let claim = slot.try_begin().unwrap();
        assert_eq!(slot.state(), RequestState::InFlight);
        claim.succeed();
    }

    #[test]
    fn reset_only_touches_settled_slots() {
        let slot = RequestSlot::new();
        slot.try_begin().unwrap().succeed();
        slot.reset();
        assert_eq!(slot.state(), RequestState::Idle);

        let claim = slot.try_begin().unwrap();
        slot.reset();
        assert!(slot.is_in_flight());
        claim.fail();
        slot.reset();
        assert_eq!(slot.state(), RequestState::Idle);
    }

    #[test]
    fn dropped_claim_returns_to_idle() {
        let slot = RequestSlot::new();
        {
            let _claim = slot.try_begin().unwrap();
            assert!(slot.is_in_flight());
        }
        assert_eq!(slot.state(), RequestState::Idle);
    }
}
