// ── Session state ──
//
// Lifecycle: Unauthenticated -> Authenticating -> Authenticated -> LoggedOut.
// A failed login returns to Unauthenticated. LoggedOut is terminal: a
// logged-out client is not reused.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::SecretString;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    LoggedOut,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
            Self::LoggedOut => "logged out",
        })
    }
}

/// An authenticated session as issued by `aaaLogin` (or renewed by
/// `aaaRefresh`).
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque session token, sent as the `cookie` attribute of every command.
    pub cookie: SecretString,
    /// Validity window reported by the device (`outRefreshPeriod`).
    pub refresh_period: Option<Duration>,
    /// Firmware version reported at login (`outVersion`).
    pub version: Option<String>,
    /// Privilege level of the login (`outPriv`).
    pub privilege: Option<String>,
    pub session_id: Option<String>,
    pub established_at: DateTime<Utc>,
}

impl Session {
    /// `true` once the refresh period has elapsed since the session was
    /// established. Sessions without a reported period never expire here.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let Some(period) = self.refresh_period else {
            return false;
        };
        chrono::Duration::from_std(period)
            .ok()
            .and_then(|period| self.established_at.checked_add_signed(period))
            .is_some_and(|deadline| now >= deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(period: Option<u64>) -> Session {
        Session {
            cookie: SecretString::from("c"),
            refresh_period: period.map(Duration::from_secs),
            version: None,
            privilege: None,
            session_id: None,
            established_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn expires_after_refresh_period() {
        let s = session(Some(600));
        let start = DateTime::<Utc>::UNIX_EPOCH;
        assert!(!s.is_expired(start + chrono::Duration::seconds(599)));
        assert!(s.is_expired(start + chrono::Duration::seconds(600)));
    }

    #[test]
    fn no_period_never_expires() {
        let s = session(None);
        assert!(!s.is_expired(DateTime::<Utc>::MAX_UTC));
    }
}
