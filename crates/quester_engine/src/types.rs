use thiserror::Error;

pub type RequestId = u64;
pub type TimerId = u64;
pub type CelebrationId = u64;

/// Why the remote query source could not produce a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("response too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOrigin {
    Remote,
    Fallback(FetchFailure),
}

/// A usable batch. Produced for every request, whether or not the remote succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub queries: Vec<String>,
    pub origin: BatchOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    BatchReady {
        request: RequestId,
        outcome: BatchOutcome,
    },
    CountdownTick {
        timer: TimerId,
    },
    CountdownExpired {
        timer: TimerId,
    },
    CelebrationElapsed {
        celebration: CelebrationId,
    },
}
