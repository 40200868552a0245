//! Ownership negotiation on the root window.
//!
//! A window manager announces itself by selecting input events on the root
//! window.  The server performs the selection atomically and only one client
//! may hold the exclusive part of it (button presses), so a second manager's
//! request fails with an `Access` error.  That failure is never retried:
//! another manager is running and this process must not carry on beside it.

use rootwm_core::EventMask;
use thiserror::Error;
use tracing::{error, info};

use super::display::{DisplayServer, SelectEventsError, WindowId};

/// Error type for the ownership claim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OwnershipError {
    /// The server refused the selection because another client holds it.
    #[error("root window event selection was denied; another window manager is likely running")]
    AccessDenied,

    /// Any other failure (malformed request, broken connection).
    #[error("root window event selection failed: {0}")]
    Request(String),
}

/// Selects `mask` on `root` in a single checked request.
///
/// On success this client exclusively receives the requested event kinds on
/// the root window.
///
/// # Errors
///
/// [`OwnershipError::AccessDenied`] if another manager holds the selection,
/// [`OwnershipError::Request`] for every other failure.
pub fn claim_ownership<S: DisplayServer + ?Sized>(
    server: &S,
    root: WindowId,
    mask: EventMask,
) -> Result<(), OwnershipError> {
    match server.select_events(root, mask) {
        Ok(()) => {
            info!("claimed root window 0x{root:x} (event mask 0x{:x})", mask.0);
            Ok(())
        }
        Err(SelectEventsError::AccessDenied) => {
            error!("root window 0x{root:x} is already managed by another client");
            Err(OwnershipError::AccessDenied)
        }
        Err(SelectEventsError::Other(reason)) => Err(OwnershipError::Request(reason)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::MockServer;
    use mockall::predicate::eq;

    #[test]
    fn test_claim_selects_mask_on_root() {
        // Arrange
        let mut server = MockServer::new();
        server
            .expect_select_events()
            .with(eq(0x1a5u32), eq(EventMask::ROOT_INPUT))
            .times(1)
            .returning(|_, _| Ok(()));

        // Act
        let result = claim_ownership(&server, 0x1a5, EventMask::ROOT_INPUT);

        // Assert
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_access_denied_means_another_manager() {
        let mut server = MockServer::new();
        server
            .expect_select_events()
            .times(1)
            .returning(|_, _| Err(SelectEventsError::AccessDenied));

        let result = claim_ownership(&server, 1, EventMask::ROOT_INPUT);

        assert_eq!(result, Err(OwnershipError::AccessDenied));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("another window manager is likely running"));
    }

    #[test]
    fn test_other_failures_are_distinct_from_access_denied() {
        let mut server = MockServer::new();
        server
            .expect_select_events()
            .times(1)
            .returning(|_, _| Err(SelectEventsError::Other("BadWindow".to_string())));

        let result = claim_ownership(&server, 1, EventMask::ROOT_INPUT);

        assert_eq!(result, Err(OwnershipError::Request("BadWindow".to_string())));
    }
}
