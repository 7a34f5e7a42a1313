//! Notification primitives for the diagnostics channel.
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use super::collaborators::Notifier;

/// Severity of a notice.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum NoticeLevel {
    /// Private diagnostics for the issuing user (selection rationale, files).
    Trace,
    Info,
    Warning,
    Error,
}

/// One notification entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn trace(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Trace, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, text)
    }

    /// Private notices go to the issuing user only.
    pub fn is_private(&self) -> bool {
        self.level == NoticeLevel::Trace
    }
}

/// Forwards notices to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Trace => tracing::debug!(target: "anim::notice", "{}", notice.text),
            NoticeLevel::Info => tracing::info!(target: "anim::notice", "{}", notice.text),
            NoticeLevel::Warning => tracing::warn!(target: "anim::notice", "{}", notice.text),
            NoticeLevel::Error => tracing::error!(target: "anim::notice", "{}", notice.text),
        }
    }
}

/// Bounded buffer of the most recent notices.
#[derive(Debug)]
pub struct NoticeLog {
    entries: Mutex<VecDeque<Notice>>,
    capacity: usize,
}

impl NoticeLog {
    pub fn new(capacity: usize) -> Self {
        let bounded_capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(bounded_capacity)),
            capacity: bounded_capacity,
        }
    }

    pub fn push(&self, notice: Notice) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(notice);
    }

    /// Copies the buffered notices, oldest first.
    pub fn snapshot(&self) -> Vec<Notice> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().cloned().collect()
    }

    /// Removes and returns the buffered notices, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.drain(..).collect()
    }

    /// Text of every buffered notice at `level`.
    pub fn texts(&self, level: NoticeLevel) -> Vec<String> {
        self.snapshot()
            .into_iter()
            .filter(|notice| notice.level == level)
            .map(|notice| notice.text)
            .collect()
    }
}

impl Default for NoticeLog {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        self.push(notice);
    }
}
