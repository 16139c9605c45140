//! # payment-handoff
//!
//! External payment redirect/return flow, treated as a minimal
//! session-handoff protocol between the host application and an opaque
//! provider page (Klarna-style hosted checkout).
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐      ┌──────────────────┐      ┌─────────────┐
//! │  Host App   │─────▶│  Provider Page   │─────▶│  Host App   │
//! │ (initiate)  │ open │  (new tab/popup) │ back │  (resume)   │
//! └──────┬──────┘      └──────────────────┘      └──────▲──────┘
//!        │ persist                                      │ consume
//!        ▼                                              │
//!   ┌────────────────────────────────────────────────────┐
//!   │        pending-return slot (origin storage)        │
//!   └────────────────────────────────────────────────────┘
//! ```
//!
//! Before the surface opens, the desired post-payment route is written to
//! a single persistent slot. The provider page is a black box: there is no
//! callback, no polling, no lifecycle tracking. Whenever the host regains
//! control — page load, usually — it calls
//! [`HandoffController::resume_if_pending`], which consumes the slot and
//! navigates back to the stored route. An empty slot is the normal case
//! and costs one storage read.
//!
//! Platform primitives (opening a surface, navigating) and the storage
//! slot are injected as capability traits, so the whole protocol runs
//! deterministically under test.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use payment_handoff::{
//!     HandoffController, MemoryReturnStore, Navigator, ResumeOutcome,
//!     SurfaceHandle, SurfaceOpener, SurfaceOptions,
//! };
//!
//! struct NoopOpener;
//! impl SurfaceOpener for NoopOpener {
//!     fn open(&self, _url: &str, _opts: &SurfaceOptions) -> Option<Box<dyn SurfaceHandle>> {
//!         None // popup blocked
//!     }
//! }
//!
//! struct NoopNavigator;
//! impl Navigator for NoopNavigator {
//!     fn navigate(&self, _url: &str) {}
//! }
//!
//! let controller = HandoffController::new(
//!     Arc::new(MemoryReturnStore::new()),
//!     Box::new(NoopOpener),
//!     Box::new(NoopNavigator),
//! );
//!
//! // User hits "pay": persist the comeback route, open the provider.
//! let result = controller
//!     .initiate("https://pay.klarna.com/session/abc", "/checkout/success")
//!     .unwrap();
//! assert!(result.return_saved);
//!
//! // Later, on page load:
//! match controller.resume_if_pending() {
//!     ResumeOutcome::Resumed(url) => assert_eq!(url, "/checkout/success"),
//!     ResumeOutcome::NoPendingReturn => unreachable!(),
//! }
//! ```

mod controller;
mod error;
mod session_id;
mod state;
mod store;
mod surface;

pub use controller::{HandoffController, HandoffResult, ResumeOutcome, SurfaceStatus};
pub use error::{HandoffError, Result};
pub use session_id::SessionId;
pub use state::{ATTEMPT_TTL_MINUTES, AttemptStatus, PaymentAttempt};
pub use store::{ATTEMPT_KEY, MemoryReturnStore, RETURN_KEY, ReturnStore};
pub use surface::{Navigator, SurfaceHandle, SurfaceOpener, SurfaceOptions, is_external_url};
