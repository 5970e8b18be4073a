// Session authentication
//
// `aaaLogin` issues a cookie that every later command carries as its
// `cookie` attribute; `aaaLogout` invalidates it. `aaaRefresh` renews it
// on request. There is no transparent re-login: expiry surfaces as a
// protocol error on the next command.

use std::time::Duration;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::client::CimcClient;
use crate::error::Error;
use crate::session::{Session, SessionState};
use crate::transport::TimeoutClass;
use crate::xml::{Command, Response};

impl CimcClient {
    /// Authenticate with the device.
    ///
    /// `aaaLogin inName inPassword`, under the login timeout class. On any
    /// failure the client stays `Unauthenticated` with no cookie and can be
    /// retried. Logging in twice, or after logout, is an `InvalidState`.
    pub async fn login(&mut self) -> Result<&Session, Error> {
        if self.state != SessionState::Unauthenticated {
            return Err(Error::InvalidState {
                action: "log in",
                state: self.state,
            });
        }

        debug!(target_host = %self.host(), user = %self.username(), "logging in");
        self.state = SessionState::Authenticating;

        let command = Command::new("aaaLogin")
            .param("inName", self.username())
            .param("inPassword", self.password().expose_secret());

        let result = match self.exchange(&command, TimeoutClass::Login).await {
            Ok(resp) => session_from_response(&resp),
            Err(e) => Err(e),
        };

        match result {
            Ok(session) => {
                debug!(
                    target_host = %self.host(),
                    version = session.version.as_deref().unwrap_or("unknown"),
                    "login successful"
                );
                self.state = SessionState::Authenticated;
                self.status_message = None;
                Ok(self.session.insert(session))
            }
            Err(e) => {
                self.state = SessionState::Unauthenticated;
                self.session = None;
                Err(e)
            }
        }
    }

    /// End the session with `aaaLogout cookie inCookie`.
    ///
    /// Once the device answers, the local session ends: the cookie is
    /// dropped and the client is `LoggedOut`. A device-side error is
    /// recorded in `status_message()` and returned; it is not retried.
    /// A timeout or connection failure leaves the session untouched, since
    /// the cookie may still be live, and logout can be tried again.
    pub async fn logout(&mut self) -> Result<(), Error> {
        if self.state != SessionState::Authenticated {
            return Err(Error::InvalidState {
                action: "log out",
                state: self.state,
            });
        }

        debug!(target_host = %self.host(), "logging out");

        let command = match &self.session {
            Some(session) => {
                Command::new("aaaLogout").param("inCookie", session.cookie.expose_secret())
            }
            None => return Err(Error::NotAuthenticated),
        };
        match self.execute(&command).await {
            Ok(_) => {
                debug!(target_host = %self.host(), "logout complete");
                self.end_session();
                self.status_message = None;
                Ok(())
            }
            Err(e) if e.is_transport() => {
                warn!(target_host = %self.host(), error = %e, "logout did not reach the device");
                Err(e)
            }
            Err(e) => {
                if let Error::Protocol { code, description } = &e {
                    let message =
                        format!("Logout Error: Server returned status code {code}: {description}");
                    warn!(target_host = %self.host(), "{message}");
                    self.status_message = Some(message);
                }
                self.end_session();
                Err(e)
            }
        }
    }

    fn end_session(&mut self) {
        self.state = SessionState::LoggedOut;
        self.session = None;
    }

    /// Renew the session cookie with `aaaRefresh`.
    ///
    /// Cookie, refresh period and establishment time are replaced together
    /// on success; on failure the current session is left untouched.
    pub async fn refresh(&mut self) -> Result<&Session, Error> {
        if self.state != SessionState::Authenticated {
            return Err(Error::InvalidState {
                action: "refresh",
                state: self.state,
            });
        }
        let Some(current) = &self.session else {
            return Err(Error::NotAuthenticated);
        };

        debug!(target_host = %self.host(), "refreshing session");

        let command = Command::new("aaaRefresh")
            .param("inCookie", current.cookie.expose_secret())
            .param("inName", self.username())
            .param("inPassword", self.password().expose_secret());
        let resp = self.execute(&command).await?;
        let renewed = session_from_response(&resp)?;

        let session = match self.session.take() {
            Some(previous) => Session {
                cookie: renewed.cookie,
                refresh_period: renewed.refresh_period.or(previous.refresh_period),
                version: renewed.version.or(previous.version),
                privilege: renewed.privilege.or(previous.privilege),
                session_id: renewed.session_id.or(previous.session_id),
                established_at: renewed.established_at,
            },
            None => renewed,
        };
        Ok(self.session.insert(session))
    }
}

/// Build a session from an `aaaLogin`/`aaaRefresh` result. A success
/// response without `outCookie` cannot authenticate anything.
fn session_from_response(resp: &Response) -> Result<Session, Error> {
    let cookie = resp
        .get("outCookie")
        .filter(|c| !c.is_empty())
        .ok_or_else(|| Error::MalformedResponse {
            message: format!("{} response carries no outCookie", resp.name()),
            status: None,
            body: String::new(),
        })?;

    Ok(Session {
        cookie: SecretString::from(cookie.to_owned()),
        refresh_period: resp
            .get("outRefreshPeriod")
            .and_then(|p| p.trim().parse::<u64>().ok())
            .map(Duration::from_secs),
        version: resp.get("outVersion").map(str::to_owned),
        privilege: resp.get("outPriv").map(str::to_owned),
        session_id: resp.get("outSessionId").map(str::to_owned),
        established_at: Utc::now(),
    })
}
