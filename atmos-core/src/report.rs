use std::{
    fmt::Debug,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tracing::{error, warn};

/// How long an error stays on screen.
pub const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(5);

const UNHANDLED_FALLBACK: &str = "Network error occurred";

/// Single channel through which every user-facing failure is reported.
pub trait ErrorReporter: Send + Sync + Debug {
    /// Hide whatever is showing and drop its text.
    fn clear(&self);

    fn show_error(&self, message: &str);

    /// Failures that escaped the normal submission handling.
    fn report_unhandled(&self, err: &(dyn std::error::Error + 'static)) {
        error!(error = %err, "unhandled failure");
        let message = err.to_string();
        if message.is_empty() {
            self.show_error(UNHANDLED_FALLBACK);
        } else {
            self.show_error(&message);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BannerState {
    pub message: String,
    pub visible: bool,
}

/// Error region with a timed auto-hide.
///
/// Each `show_error` starts its own hide timer. Timers are not reset by later errors,
/// so an older timer can hide a newer message early.
#[derive(Debug, Clone)]
pub struct ErrorBanner {
    state: Arc<Mutex<BannerState>>,
    hide_after: Duration,
}

impl Default for ErrorBanner {
    fn default() -> Self {
        Self::new(ERROR_DISPLAY_DURATION)
    }
}

impl ErrorBanner {
    pub fn new(hide_after: Duration) -> Self {
        Self { state: Arc::new(Mutex::new(BannerState::default())), hide_after }
    }

    fn lock(&self) -> MutexGuard<'_, BannerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> BannerState {
        self.lock().clone()
    }

    pub fn is_visible(&self) -> bool {
        self.lock().visible
    }

    pub fn message(&self) -> String {
        self.lock().message.clone()
    }
}

impl ErrorReporter for ErrorBanner {
    fn clear(&self) {
        let mut state = self.lock();
        state.visible = false;
        state.message.clear();
    }

    fn show_error(&self, message: &str) {
        {
            let mut state = self.lock();
            state.message = message.to_string();
            state.visible = true;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime, error banner will stay visible");
            return;
        };

        let state = Arc::clone(&self.state);
        let hide_after = self.hide_after;
        handle.spawn(async move {
            tokio::time::sleep(hide_after).await;
            state.lock().unwrap_or_else(PoisonError::into_inner).visible = false;
        });
    }
}
