use std::time::Duration;

use crate::{CelebrationId, QueryCount, RequestId, TimerId, TimerSeconds, Volume};

/// How long a transient notification stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Commands the core asks the platform to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RequestBatch { request: RequestId, size: QueryCount },
    /// Best-effort; failures are swallowed by the platform.
    CopyToClipboard { text: String },
    OpenUrl { url: String },
    /// Never emitted while muted.
    PlayCue { volume: Volume },
    ShowToast { message: String, duration: Duration },
    StartCountdown { timer: TimerId, seconds: TimerSeconds },
    /// Release both handles of `timer` without notifying.
    CancelCountdown { timer: TimerId },
    ScheduleCelebrationEnd { celebration: CelebrationId, after: Duration },
}
