//! Quester core: pure query-lifecycle state machine and view-model helpers.
mod celebration;
mod completion;
mod countdown;
mod effect;
mod history;
mod msg;
mod query;
mod settings;
mod state;
mod update;
mod view_model;

pub use celebration::{CelebrationId, CelebrationTrigger, CELEBRATION_DURATION};
pub use completion::{CompletionTracker, MarkOutcome};
pub use countdown::{ActiveCountdown, CountdownStart, CountdownTimer, TimerId};
pub use effect::{Effect, TOAST_DURATION};
pub use history::{HistoryLog, HISTORY_CAPACITY};
pub use msg::Msg;
pub use query::{search_url, Batch, BatchId, BatchOrigin, QueryId, QueryItem, RequestId};
pub use settings::{QueryCount, TimerSeconds, Volume};
pub use state::AppState;
pub use update::update;
pub use view_model::{AppViewModel, CountdownView, QueryCardView, HISTORY_DISPLAY_LIMIT};
