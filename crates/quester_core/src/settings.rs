//! Clamped user inputs. Out-of-range values are corrected here, so the
//! rest of the core never sees them.

/// Number of queries requested per batch, always in `1..=30`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryCount(u8);

impl QueryCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 30;
    pub const DEFAULT: u8 = 6;

    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    /// Parses raw input text. Empty or non-numeric input counts as 1.
    pub fn parse(raw: &str) -> Self {
        Self::clamped(raw.trim().parse().unwrap_or(1))
    }

    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl Default for QueryCount {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Countdown length in seconds, always in `1..=300`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerSeconds(u16);

impl TimerSeconds {
    pub const MIN: u16 = 1;
    pub const MAX: u16 = 300;
    pub const DEFAULT: u16 = 8;

    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u16)
    }

    /// Parses raw input text. Empty or non-numeric input falls back to the default.
    pub fn parse(raw: &str) -> Self {
        Self::clamped(raw.trim().parse().unwrap_or(i64::from(Self::DEFAULT)))
    }

    pub fn get(self) -> u32 {
        u32::from(self.0)
    }
}

impl Default for TimerSeconds {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Audio cue level in `0.0..=1.0`, stored in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Volume(u8);

impl Volume {
    pub const FULL: Volume = Volume(100);

    pub fn clamped(level: f32) -> Self {
        if level.is_nan() {
            return Self::FULL;
        }
        Self((level.clamp(0.0, 1.0) * 100.0).round() as u8)
    }

    pub fn percent(self) -> u8 {
        self.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::FULL
    }
}
