// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Fluxnode Inc.

//! Logging infrastructure for the Fluxnode firmware
//!
//! A lightweight, no_std logging system. Entries are written to a bounded
//! in-memory buffer and can be drained over the diagnostic channel after
//! boot. When the buffer is full the oldest entry is evicted.

use core::fmt::{self, Write};
use heapless::{Deque, String};

/// Maximum log message length
pub const MAX_LOG_MESSAGE_LEN: usize = 96;

/// Log buffer capacity (number of entries)
pub const LOG_BUFFER_SIZE: usize = 16;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LogLevel {
    /// Errors that require immediate attention
    Error = 0,
    /// Warnings about potential issues
    Warn = 1,
    /// Informational messages
    Info = 2,
    /// Debug messages (development only)
    Debug = 3,
}

impl LogLevel {
    /// Get the log level name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single buffered log entry
#[derive(Clone)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Component name
    pub component: &'static str,
    /// Formatted message, truncated to [`MAX_LOG_MESSAGE_LEN`]
    pub message: String<MAX_LOG_MESSAGE_LEN>,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.level, self.component, self.message)
    }
}

/// Bounded FIFO log buffer
pub struct LogBuffer {
    entries: Deque<LogEntry, LOG_BUFFER_SIZE>,
    min_level: LogLevel,
}

impl LogBuffer {
    /// Create a new empty log buffer recording up to `Info`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Deque::new(),
            min_level: LogLevel::Info,
        }
    }

    /// Set the minimum recorded level
    pub fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Get the minimum recorded level
    #[must_use]
    pub const fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Check whether `level` would be recorded
    #[must_use]
    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    /// Record a formatted message, evicting the oldest entry when full
    pub fn log(&mut self, level: LogLevel, component: &'static str, args: fmt::Arguments<'_>) {
        if !self.should_log(level) {
            return;
        }

        let mut message = String::new();
        // Truncation on overflow is acceptable for diagnostics
        let _ = message.write_fmt(args);

        let entry = LogEntry {
            level,
            component,
            message,
        };

        if self.entries.is_full() {
            self.entries.pop_front();
        }
        // Cannot fail: a slot was just freed if the deque was full
        let _ = self.entries.push_back(entry);
    }

    /// Number of buffered entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the buffer is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discard all buffered entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over buffered entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Log an error message
#[macro_export]
macro_rules! log_error {
    ($buffer:expr, $component:expr, $($arg:tt)*) => {
        $buffer.log($crate::log::LogLevel::Error, $component, format_args!($($arg)*))
    };
}

/// Log a warning message
#[macro_export]
macro_rules! log_warn {
    ($buffer:expr, $component:expr, $($arg:tt)*) => {
        $buffer.log($crate::log::LogLevel::Warn, $component, format_args!($($arg)*))
    };
}

/// Log an informational message
#[macro_export]
macro_rules! log_info {
    ($buffer:expr, $component:expr, $($arg:tt)*) => {
        $buffer.log($crate::log::LogLevel::Info, $component, format_args!($($arg)*))
    };
}

/// Log a debug message
#[macro_export]
macro_rules! log_debug {
    ($buffer:expr, $component:expr, $($arg:tt)*) => {
        $buffer.log($crate::log::LogLevel::Debug, $component, format_args!($($arg)*))
    };
}
