//! KeyMap cache: fetches the keyboard mapping once at startup.

use rootwm_core::keymap::{KEYCODE_COUNT, MIN_KEYCODE};
use rootwm_core::{KeyMapError, KeyMapTable};
use thiserror::Error;
use tracing::info;

use super::display::{DisplayError, DisplayServer};

/// Error type for the keymap load.
#[derive(Debug, Error)]
pub enum KeyMapLoadError {
    #[error("keyboard mapping request failed: {0}")]
    Request(#[source] DisplayError),

    #[error("keyboard mapping reply is unusable: {0}")]
    Malformed(#[from] KeyMapError),
}

/// Fetches keysyms for codes 8..=255 in one round trip and builds the table.
///
/// # Errors
///
/// Returns [`KeyMapLoadError::Request`] if the server does not answer and
/// [`KeyMapLoadError::Malformed`] if the reply cannot be reshaped.  Both are
/// fatal: the dispatcher cannot resolve keys without the table.
pub fn load_key_map<S: DisplayServer + ?Sized>(server: &S) -> Result<KeyMapTable, KeyMapLoadError> {
    let mapping = server
        .keyboard_mapping(MIN_KEYCODE, KEYCODE_COUNT)
        .map_err(KeyMapLoadError::Request)?;

    let table = KeyMapTable::from_reply(mapping.keysyms_per_keycode, mapping.keysyms)?;
    info!(
        "keyboard mapping loaded: {} codes, {} keysyms per code",
        KEYCODE_COUNT,
        table.stride()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::display::KeyboardMapping;
    use crate::application::test_support::MockServer;
    use mockall::predicate::eq;
    use rootwm_core::KeySym;

    #[test]
    fn test_requests_codes_8_through_255_once() {
        // Arrange
        let mut server = MockServer::new();
        server
            .expect_keyboard_mapping()
            .with(eq(8u8), eq(248u8))
            .times(1)
            .returning(|_, count| {
                Ok(KeyboardMapping {
                    keysyms_per_keycode: 2,
                    keysyms: vec![KeySym(0x0061); usize::from(count) * 2],
                })
            });

        // Act
        let table = load_key_map(&server).expect("load must succeed");

        // Assert
        assert_eq!(table.stride(), 2);
        assert_eq!(table.symbols_for(8).len(), 2);
    }

    #[test]
    fn test_failed_request_is_reported() {
        let mut server = MockServer::new();
        server
            .expect_keyboard_mapping()
            .returning(|_, _| Err(DisplayError::Request("no reply".to_string())));

        let result = load_key_map(&server);

        assert!(matches!(result, Err(KeyMapLoadError::Request(_))));
    }

    #[test]
    fn test_truncated_reply_is_rejected() {
        let mut server = MockServer::new();
        server.expect_keyboard_mapping().returning(|_, _| {
            Ok(KeyboardMapping {
                keysyms_per_keycode: 3,
                keysyms: vec![KeySym::NO_SYMBOL; 12],
            })
        });

        let result = load_key_map(&server);

        assert!(matches!(
            result,
            Err(KeyMapLoadError::Malformed(KeyMapError::LengthMismatch { .. }))
        ));
    }
}
