//! Injected dependencies shared by the scan gate and roster reducers.

use crate::api::CheckinApi;
use crate::normalize::CodeNormalizer;
use crate::redemption::RedemptionClient;
use crate::roster::RosterClient;
use checkin_core::environment::{Clock, SystemClock};
use std::sync::Arc;

/// Environment for every check-in reducer
///
/// Production wires an `HttpCheckinApi` and the `SystemClock`; tests use
/// `MockCheckinApi` and a `FixedClock`.
#[derive(Clone)]
pub struct CheckinEnvironment {
    redemption: RedemptionClient,
    roster: RosterClient,
    normalizer: CodeNormalizer,
    clock: Arc<dyn Clock>,
}

impl CheckinEnvironment {
    /// Create an environment over one transport
    #[must_use]
    pub fn new(
        api: Arc<dyn CheckinApi>,
        normalizer: CodeNormalizer,
        include_list_entries: bool,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            redemption: RedemptionClient::new(Arc::clone(&api)),
            roster: RosterClient::new(api, include_list_entries),
            normalizer,
            clock,
        }
    }

    /// Environment with the default prefix, tickets only and the system clock
    #[must_use]
    pub fn with_defaults(api: Arc<dyn CheckinApi>) -> Self {
        Self::new(api, CodeNormalizer::default(), false, Arc::new(SystemClock))
    }

    /// Client for the mutating endpoints
    #[must_use]
    pub const fn redemption(&self) -> &RedemptionClient {
        &self.redemption
    }

    /// Client for the listing endpoints
    #[must_use]
    pub const fn roster(&self) -> &RosterClient {
        &self.roster
    }

    /// Scan payload normalizer
    #[must_use]
    pub const fn normalizer(&self) -> &CodeNormalizer {
        &self.normalizer
    }

    /// Clock used to stamp scan outcomes
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

impl std::fmt::Debug for CheckinEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckinEnvironment")
            .field("roster", &self.roster)
            .field("normalizer", &self.normalizer)
            .finish_non_exhaustive()
    }
}
