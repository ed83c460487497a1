//! Application coordinator: the check-in client as seen by a front end.

use super::{CheckinAction, CheckinReducer, CheckinState};
use crate::api::{CheckinApi, HttpCheckinApi};
use crate::config::Config;
use crate::environment::CheckinEnvironment;
use crate::error::CheckinResult;
use crate::normalize::CodeNormalizer;
use crate::roster::{Notice, RosterAction};
use crate::scan_gate::{ScanEvent, ScanGateAction, ScanSession};
use crate::types::{Mutation, TicketId, TicketRecord};
use checkin_core::environment::SystemClock;
use checkin_runtime::{EffectHandle, Store, StoreError};
use std::sync::Arc;

type CheckinStore = Store<CheckinState, CheckinAction, CheckinEnvironment, CheckinReducer>;

/// The check-in client.
///
/// Wraps a [`Store`] running the [`CheckinReducer`]. Every trigger returns
/// an [`EffectHandle`] that completes once the request it started, and the
/// roster refresh that follows it, have been applied.
#[derive(Clone)]
pub struct CheckinApp {
    store: Arc<CheckinStore>,
}

impl CheckinApp {
    /// Create the client over an environment
    #[must_use]
    pub fn new(environment: CheckinEnvironment) -> Self {
        Self {
            store: Arc::new(Store::new(
                CheckinState::new(),
                CheckinReducer::new(),
                environment,
            )),
        }
    }

    /// Create the client talking to the configured service
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> CheckinResult<Self> {
        let api: Arc<dyn CheckinApi> = Arc::new(HttpCheckinApi::with_timeout(
            config.api.base_url.clone(),
            config.api.request_timeout(),
        )?);

        tracing::info!(
            base_url = %config.api.base_url,
            list_entries = config.api.list_entries,
            "Check-in client configured"
        );

        Ok(Self::new(CheckinEnvironment::new(
            api,
            CodeNormalizer::new(config.scanner.prefix.clone()),
            config.api.list_entries,
            Arc::new(SystemClock),
        )))
    }

    /// Arm the scan gate and load the roster
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TornDown`] after [`teardown`](Self::teardown).
    pub async fn start(&self) -> Result<EffectHandle, StoreError> {
        self.store.send(CheckinAction::Start).await
    }

    /// Return the scan gate to idle
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TornDown`] after [`teardown`](Self::teardown).
    pub async fn stop(&self) -> Result<EffectHandle, StoreError> {
        self.store.send(CheckinAction::Stop).await
    }

    /// Feed one payload from the scan source
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TornDown`] after [`teardown`](Self::teardown).
    pub async fn scan(
        &self,
        payload_type: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<EffectHandle, StoreError> {
        self.gate(ScanGateAction::Scanned(ScanEvent::new(payload_type, payload)))
            .await
    }

    /// Dismiss the displayed scan result
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TornDown`] after [`teardown`](Self::teardown).
    pub async fn acknowledge(&self) -> Result<EffectHandle, StoreError> {
        self.gate(ScanGateAction::Acknowledge).await
    }

    /// Redeem a ticket from the list
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TornDown`] after [`teardown`](Self::teardown).
    pub async fn redeem(&self, id: impl Into<TicketId>) -> Result<EffectHandle, StoreError> {
        self.apply(Mutation::Redeem(id.into())).await
    }

    /// Mark a list entry as paid
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TornDown`] after [`teardown`](Self::teardown).
    pub async fn mark_paid(&self, id: impl Into<TicketId>) -> Result<EffectHandle, StoreError> {
        self.apply(Mutation::MarkPaid(id.into())).await
    }

    /// Apply the kind-appropriate mutation to a record
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TornDown`] after [`teardown`](Self::teardown).
    pub async fn act_on(&self, record: &TicketRecord) -> Result<EffectHandle, StoreError> {
        self.apply(record.mutation()).await
    }

    /// Apply a mutation
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TornDown`] after [`teardown`](Self::teardown).
    pub async fn apply(&self, mutation: Mutation) -> Result<EffectHandle, StoreError> {
        self.roster(RosterAction::Apply(mutation)).await
    }

    /// Change the search query
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TornDown`] after [`teardown`](Self::teardown).
    pub async fn set_query(&self, query: impl Into<String>) -> Result<EffectHandle, StoreError> {
        self.roster(RosterAction::SetQuery(query.into())).await
    }

    /// Refetch the roster
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TornDown`] after [`teardown`](Self::teardown).
    pub async fn refresh(&self) -> Result<EffectHandle, StoreError> {
        self.roster(RosterAction::Refresh).await
    }

    /// Dismiss the last list-action notice
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TornDown`] after [`teardown`](Self::teardown).
    pub async fn dismiss_notice(&self) -> Result<EffectHandle, StoreError> {
        self.roster(RosterAction::DismissNotice).await
    }

    /// Snapshot of the scan session
    pub async fn session(&self) -> ScanSession {
        self.store.state(|s| s.session.clone()).await
    }

    /// Records matching the current query
    pub async fn visible_roster(&self) -> Vec<TicketRecord> {
        self.store
            .state(|s| s.roster.visible().cloned().collect())
            .await
    }

    /// Every record of the last load
    pub async fn roster_records(&self) -> Vec<TicketRecord> {
        self.store.state(|s| s.roster.records.clone()).await
    }

    /// Outcome of the last list action
    pub async fn notice(&self) -> Option<Notice> {
        self.store.state(|s| s.roster.last_notice.clone()).await
    }

    /// Read arbitrary state
    pub async fn with_state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&CheckinState) -> T,
    {
        self.store.state(f).await
    }

    /// Stop accepting input and abandon every in-flight request
    pub async fn teardown(&self) {
        self.store.teardown().await;
    }

    /// Whether [`teardown`](Self::teardown) has run
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.store.is_torn_down()
    }

    async fn gate(&self, action: ScanGateAction) -> Result<EffectHandle, StoreError> {
        self.store.send(CheckinAction::Gate(action)).await
    }

    async fn roster(&self, action: RosterAction) -> Result<EffectHandle, StoreError> {
        self.store.send(CheckinAction::Roster(action)).await
    }
}

impl std::fmt::Debug for CheckinApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckinApp")
            .field("torn_down", &self.is_torn_down())
            .finish_non_exhaustive()
    }
}
