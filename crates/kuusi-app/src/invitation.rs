//! Invitation gate
//!
//! Sign-up is gated behind a shared code. Passing it once is remembered on
//! the device through the `invitationVerified` flag, which the splash reads.

use crate::errors::AppError;
use crate::flags::PersistedFlags;
use crate::routes::Screen;

/// Checks invitation codes and records success.
#[derive(Clone)]
pub struct InvitationGate {
    flags: PersistedFlags,
    code: String,
}

impl InvitationGate {
    /// Gate that accepts `code`
    pub fn new(flags: PersistedFlags, code: impl Into<String>) -> Self {
        Self {
            flags,
            code: code.into(),
        }
    }

    /// Whether this device has already passed the gate
    pub fn is_open(&self) -> bool {
        self.flags.invitation_verified()
    }

    /// Check a code entered by the user.
    ///
    /// Surrounding whitespace is ignored; the comparison is case-sensitive.
    /// On success the flag is persisted and the sign-in screen is returned.
    pub fn submit_code(&self, input: &str) -> Result<Screen, AppError> {
        if input.trim() != self.code {
            tracing::debug!("Invitation code rejected");
            return Err(AppError::input("invitation code", "code does not match"));
        }
        self.flags.mark_invitation_verified()?;
        tracing::info!("Invitation gate passed");
        Ok(Screen::Auth)
    }
}
