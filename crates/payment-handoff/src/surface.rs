//! Platform Surfaces
//!
//! Capability traits for the two platform primitives the controller
//! consumes: opening an external browsing context and navigating the
//! current one. Injected rather than called as globals so the whole flow
//! can run against fakes in tests.

use serde::{Deserialize, Serialize};
use url::Url;

/// How the external surface should be opened
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceOptions {
    /// Popup width in pixels
    pub width: u32,

    /// Popup height in pixels
    pub height: u32,

    /// Window name, reused across opens so repeated attempts share one popup
    pub name: String,

    /// Open a full new tab instead of a sized popup. Redirect-based
    /// providers such as Klarna misbehave inside a constrained popup.
    pub force_new_tab: bool,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            width: 500,
            height: 700,
            name: "PaymentWindow".into(),
            force_new_tab: false,
        }
    }
}

impl SurfaceOptions {
    /// Options for redirect-based providers that need a real tab
    pub fn new_tab() -> Self {
        Self {
            force_new_tab: true,
            ..Self::default()
        }
    }
}

/// Handle to an opened external surface.
///
/// The platform owns the surface; this handle carries no lifecycle control
/// and may go stale immediately after the open. The only thing the
/// controller ever asks of it is focus.
pub trait SurfaceHandle {
    /// Best-effort focus request; failure is not observable and not an error.
    fn focus(&self);
}

/// Opens a URL in a new, independent top-level browsing context.
///
/// Implementations must request isolation in both directions: the opened
/// context must not be able to script the opener, and the opener keeps no
/// control over the opened context beyond the returned handle's focus
/// request (`noopener,noreferrer` semantics on the web).
///
/// `None` means the platform refused to open the context — typically a
/// popup blocker. That is a normal outcome, not a failure.
pub trait SurfaceOpener: Send + Sync {
    fn open(&self, url: &str, options: &SurfaceOptions) -> Option<Box<dyn SurfaceHandle>>;
}

/// Navigates the current browsing context
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str);
}

/// Whether `candidate` points outside `current_host`.
///
/// Relative URLs and unparseable input are never external.
pub fn is_external_url(candidate: &str, current_host: &str) -> bool {
    match Url::parse(candidate) {
        Ok(parsed) => parsed.host_str().is_some_and(|host| host != current_host),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = SurfaceOptions::default();
        assert_eq!(opts.width, 500);
        assert_eq!(opts.height, 700);
        assert_eq!(opts.name, "PaymentWindow");
        assert!(!opts.force_new_tab);
    }

    #[test]
    fn test_new_tab_options() {
        assert!(SurfaceOptions::new_tab().force_new_tab);
    }

    #[test]
    fn test_external_url_detection() {
        assert!(is_external_url("https://pay.klarna.com/start", "shop.example.com"));
        assert!(!is_external_url("https://shop.example.com/cart", "shop.example.com"));
    }

    #[test]
    fn test_relative_and_garbage_are_not_external() {
        assert!(!is_external_url("/checkout/success", "shop.example.com"));
        assert!(!is_external_url("not a url", "shop.example.com"));
        assert!(!is_external_url("", "shop.example.com"));
    }
}
