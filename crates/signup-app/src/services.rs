use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[derive(Clone, PartialEq, Eq)]
pub struct AccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for AccountRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountReceipt {
    pub email: String,
    pub created_at: String,
}

#[derive(Debug)]
pub struct CreationEvent {
    pub token: u64,
    pub result: Result<AccountReceipt, String>,
}

/// Creates accounts off the UI thread.
///
/// Implementations report exactly one [`CreationEvent`] on the returned
/// channel, tagged with the token they were handed.
pub trait AccountCreationService: Send + Sync {
    fn spawn_create(&self, request: AccountRequest, token: u64) -> Receiver<CreationEvent>;
}

/// Stand-in backend: waits `delay`, then always reports success.
///
/// At most one simulated call sleeps at a time. Starting a new call ends the
/// previous worker without a completion.
#[derive(Debug)]
pub struct SimulatedAccountService {
    delay: Duration,
    pending: Mutex<Option<Sender<()>>>,
}

impl SimulatedAccountService {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }
}

impl AccountCreationService for SimulatedAccountService {
    fn spawn_create(&self, request: AccountRequest, token: u64) -> Receiver<CreationEvent> {
        let (sender, receiver) = mpsc::channel();
        let (cancel, cancelled) = mpsc::channel::<()>();
        let superseded = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(cancel);
        if superseded.is_some() {
            log::debug!("superseding earlier simulated account creation");
        }

        let delay = self.delay;
        std::thread::spawn(move || {
            if !matches!(cancelled.recv_timeout(delay), Err(RecvTimeoutError::Timeout)) {
                log::debug!("simulated account creation for token {token} superseded");
                return;
            }
            let result = signup_core::time::now_utc_rfc3339()
                .map(|created_at| AccountReceipt {
                    email: request.email,
                    created_at,
                })
                .map_err(|error| format!("failed to format timestamp: {error}"));
            log::debug!("simulated account creation finished for token {token}");
            let _ = sender.send(CreationEvent { token, result });
        });
        receiver
    }
}

pub trait NotificationSink {
    fn show(&self, message: &str);
}

/// Writes notifications to the `log` facade.
#[derive(Debug, Default)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn show(&self, message: &str) {
        log::info!("notification: {message}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialProvider {
    Google,
    GitHub,
}

impl SocialProvider {
    pub fn title(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::GitHub => "GitHub",
        }
    }

    pub fn pending_notice(self) -> String {
        format!("{} sign-in is still in development", self.title())
    }
}
