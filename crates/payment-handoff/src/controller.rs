//! Payment Handoff Controller
//!
//! Owns the open/return protocol: persist where the user should land,
//! open the external payment surface, and on some later entry point
//! consume the pending return and navigate back.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{HandoffError, Result};
use crate::session_id::SessionId;
use crate::state::{AttemptStatus, PaymentAttempt};
use crate::store::ReturnStore;
use crate::surface::{Navigator, SurfaceOpener, SurfaceOptions};

/// Whether the platform produced the external surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceStatus {
    /// Handle obtained; focus was requested
    Opened,
    /// The platform refused to open the context (popup blocker). The
    /// pending return stays persisted so a manual retry still resumes
    /// correctly.
    Blocked,
}

/// Outcome of [`HandoffController::initiate`]
#[derive(Clone, Debug)]
pub struct HandoffResult {
    /// What happened at the open step
    pub surface: SurfaceStatus,

    /// False when storage was unavailable. The open was still attempted,
    /// but resume-on-return will find nothing.
    pub return_saved: bool,

    /// Id tagged onto the attempt record, for correlating the return
    pub session_id: SessionId,
}

/// Outcome of [`HandoffController::resume_if_pending`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// A pending return was consumed and the navigator pointed at it.
    /// The target is included so hosts can intercept or log the hop.
    Resumed(String),

    /// Nothing pending. Also reported when storage is unreadable: never
    /// navigate on uncertain data.
    NoPendingReturn,
}

/// Coordinates the handoff to an external payment surface and the resume
/// back into the host application.
///
/// `initiate` runs in response to a user action; `resume_if_pending` runs
/// at every entry point where the external surface might have handed
/// control back (page load at minimum), with no scheduling relationship
/// between the two beyond "happens after, possibly across a restart."
pub struct HandoffController<S: ReturnStore> {
    store: Arc<S>,
    opener: Box<dyn SurfaceOpener>,
    navigator: Box<dyn Navigator>,
    options: SurfaceOptions,
}

impl<S: ReturnStore> HandoffController<S> {
    /// Create a controller with default surface options
    pub fn new(
        store: Arc<S>,
        opener: Box<dyn SurfaceOpener>,
        navigator: Box<dyn Navigator>,
    ) -> Self {
        Self::with_options(store, opener, navigator, SurfaceOptions::default())
    }

    /// Create a controller with explicit surface options
    pub fn with_options(
        store: Arc<S>,
        opener: Box<dyn SurfaceOpener>,
        navigator: Box<dyn Navigator>,
        options: SurfaceOptions,
    ) -> Self {
        Self {
            store,
            opener,
            navigator,
            options,
        }
    }

    /// Persist the return target and open the external payment surface.
    ///
    /// Rejects empty URLs before any side effect. After that, the two
    /// effects are independent: a blocked popup does not roll back the
    /// stored return target (the user may follow a manual link and still
    /// come back), and a storage failure does not abort the open (the
    /// payment can still proceed, just without an automatic resume).
    pub fn initiate(&self, target_url: &str, return_to: &str) -> Result<HandoffResult> {
        if target_url.trim().is_empty() {
            return Err(HandoffError::MalformedTarget("target URL is empty".into()));
        }
        if return_to.trim().is_empty() {
            return Err(HandoffError::MalformedTarget("return URL is empty".into()));
        }

        let session_id = SessionId::generate();

        let return_saved = match self.store.put_return(return_to) {
            Ok(()) => {
                // Attempt record is best-effort bookkeeping; the return
                // slot alone is enough for the resume to work.
                if let Err(e) = self
                    .store
                    .save_attempt(&PaymentAttempt::new(session_id.clone()))
                {
                    warn!(error = %e, "failed to record payment attempt");
                }
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to persist return target, opening anyway");
                false
            }
        };

        let surface = match self.opener.open(target_url, &self.options) {
            Some(handle) => {
                handle.focus();
                debug!(session_id = %session_id, "payment surface opened");
                SurfaceStatus::Opened
            }
            None => {
                debug!(session_id = %session_id, "platform refused to open payment surface");
                SurfaceStatus::Blocked
            }
        };

        Ok(HandoffResult {
            surface,
            return_saved,
            session_id,
        })
    }

    /// Consume the pending return, if any, and navigate back to it.
    ///
    /// The empty slot is the common, cheap path. A stored value is
    /// delivered to at most one call, subject to the store's
    /// [`take_return`](ReturnStore::take_return) atomicity.
    pub fn resume_if_pending(&self) -> ResumeOutcome {
        match self.store.take_return() {
            Ok(Some(return_to)) => {
                debug!(%return_to, "resuming pending return");
                self.navigator.navigate(&return_to);
                ResumeOutcome::Resumed(return_to)
            }
            Ok(None) => ResumeOutcome::NoPendingReturn,
            Err(e) => {
                warn!(error = %e, "return storage unreadable, treating as no pending return");
                ResumeOutcome::NoPendingReturn
            }
        }
    }

    /// The current attempt record, if one exists and is still fresh.
    /// Stale or unreadable records read as absent.
    pub fn current_attempt(&self) -> Option<PaymentAttempt> {
        match self.store.load_attempt() {
            Ok(Some(attempt)) if attempt.is_fresh() => Some(attempt),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "attempt record unreadable");
                None
            }
        }
    }

    /// Record the terminal status of the current attempt
    pub fn finish_attempt(&self, status: AttemptStatus) -> Result<()> {
        match self.store.load_attempt()? {
            Some(mut attempt) => {
                attempt.set_status(status);
                self.store.save_attempt(&attempt)
            }
            None => Ok(()),
        }
    }

    /// Drop the attempt record entirely
    pub fn clear_attempt(&self) -> Result<()> {
        self.store.clear_attempt()
    }
}
