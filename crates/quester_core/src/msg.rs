use crate::{
    BatchOrigin, CelebrationId, QueryCount, QueryItem, RequestId, TimerId, TimerSeconds, Volume,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the query count input (already clamped).
    CountChanged(QueryCount),
    /// User edited the countdown length input (already clamped).
    TimerChanged(TimerSeconds),
    /// User moved the volume slider.
    VolumeChanged(Volume),
    /// User toggled audio mute.
    MuteToggled,
    /// User asked for a new batch.
    FetchClicked,
    /// The query source resolved a request, remotely or by fallback.
    BatchLoaded {
        request: RequestId,
        queries: Vec<String>,
        origin: BatchOrigin,
    },
    /// User copied a query card.
    CopyClicked(QueryItem),
    /// User opened a query card in the browser.
    OpenClicked(QueryItem),
    /// One-second display refresh of a countdown.
    CountdownTick(TimerId),
    /// A countdown ran its full duration.
    CountdownExpired(TimerId),
    /// The celebration display time is over.
    CelebrationElapsed(CelebrationId),
    /// User cleared the history panel.
    ClearHistoryClicked,
    /// The presentation layer is shutting down.
    Teardown,
    /// Fallback for placeholder wiring.
    NoOp,
}
