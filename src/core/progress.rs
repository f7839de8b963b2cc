//! Download progress state machine
//!
//! Two presentation policies exist and are kept strictly apart:
//! [`TransferProgress`] advances from real transfer events (bytes received
//! against a known `Content-Length`), while [`SyntheticProgress`] is a
//! fixed-interval random walk for when no real signal is available. A client
//! picks one; the types never share a code path.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fixed ordered phase labels, selected by percentage quartile.
pub const PHASE_LABELS: [&str; 5] = [
    "Connecting to server...",
    "Fetching metadata...",
    "Downloading video...",
    "Processing file...",
    "Done!",
];

/// Tick interval for the synthetic policy.
pub const SYNTHETIC_TICK: Duration = Duration::from_millis(500);

/// Explicit state of one download as seen by a client.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressState {
    Idle,

    Connecting,

    Transferring {
        bytes_received: u64,
        /// `None` when the response carried no `Content-Length`.
        total_bytes: Option<u64>,
    },

    Complete,

    Failed(String),
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::Idle
    }
}

impl ProgressState {
    /// Completion percentage, when one can be computed.
    ///
    /// `None` for a transfer with unknown total and for failures; callers
    /// with no percentage fall back to the synthetic policy for display.
    pub fn percent(&self) -> Option<f64> {
        match self {
            Self::Idle | Self::Connecting => Some(0.0),
            Self::Transferring {
                bytes_received,
                total_bytes: Some(total),
            } => {
                if *total == 0 {
                    Some(100.0)
                } else {
                    Some((*bytes_received as f64 / *total as f64 * 100.0).min(100.0))
                }
            }
            Self::Transferring {
                total_bytes: None, ..
            } => None,
            Self::Complete => Some(100.0),
            Self::Failed(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed(_))
    }
}

/// Map a percentage to one of the five phase labels by quartile.
pub fn phase_label(percent: f64) -> &'static str {
    let index = (percent / 25.0).floor().max(0.0) as usize;
    PHASE_LABELS[index.min(PHASE_LABELS.len() - 1)]
}

/// Progress driven by real transfer events.
#[derive(Debug, Default)]
pub struct TransferProgress {
    state: ProgressState,
}

impl TransferProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    /// The request has been issued; no response yet.
    pub fn connect(&mut self) {
        self.state = ProgressState::Connecting;
    }

    /// Response headers arrived; `total_bytes` is the parsed
    /// `Content-Length`, when present.
    pub fn begin(&mut self, total_bytes: Option<u64>) {
        self.state = ProgressState::Transferring {
            bytes_received: 0,
            total_bytes,
        };
    }

    /// Account for one received chunk. Ignored outside of a transfer.
    pub fn advance(&mut self, bytes: u64) {
        if let ProgressState::Transferring { bytes_received, .. } = &mut self.state {
            *bytes_received += bytes;
        }
    }

    pub fn complete(&mut self) {
        self.state = ProgressState::Complete;
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.state = ProgressState::Failed(reason.into());
    }
}

/// Synthetic progress: a random increment of 0–15 percentage points per
/// tick until 100 is reached.
#[derive(Debug)]
pub struct SyntheticProgress {
    percent: f64,
    rng: StdRng,
}

impl SyntheticProgress {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self { percent: 0.0, rng }
    }

    /// Advance one tick and return the new percentage, capped at 100.
    pub fn step(&mut self) -> f64 {
        self.percent = (self.percent + self.rng.gen_range(0.0..15.0)).min(100.0);
        self.percent
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub fn is_complete(&self) -> bool {
        self.percent >= 100.0
    }
}

impl Default for SyntheticProgress {
    fn default() -> Self {
        Self::new()
    }
}
