//! Syslog sink for daemonized pipelines.
//!
//! Records are mapped onto syslog severities by level band and submitted
//! through libc with a `%s` format, so rendered text is never interpreted as
//! a format string.

use std::ffi::CString;
use std::fmt;
use std::io;

use logging::levels::{FATAL, INFO, Level, WARN};
use logging::{LogRecord, LogSink};

use crate::error::SinkError;

/// Syslog facility codes matching the POSIX syslog(3) constants.
///
/// Each variant corresponds to a `LOG_*` facility from `<syslog.h>`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(i32)]
pub enum SyslogFacility {
    /// Kernel messages (LOG_KERN).
    Kern = libc::LOG_KERN,
    /// User-level messages (LOG_USER), the default for applications.
    #[default]
    User = libc::LOG_USER,
    /// Mail system (LOG_MAIL).
    Mail = libc::LOG_MAIL,
    /// System daemons (LOG_DAEMON).
    Daemon = libc::LOG_DAEMON,
    /// Security/authorization messages (LOG_AUTH).
    Auth = libc::LOG_AUTH,
    /// Messages generated internally by syslogd (LOG_SYSLOG).
    Syslog = libc::LOG_SYSLOG,
    /// Clock daemon (LOG_CRON).
    Cron = libc::LOG_CRON,
    /// Reserved for local use (LOG_LOCAL0).
    Local0 = libc::LOG_LOCAL0,
    /// Reserved for local use (LOG_LOCAL1).
    Local1 = libc::LOG_LOCAL1,
    /// Reserved for local use (LOG_LOCAL2).
    Local2 = libc::LOG_LOCAL2,
    /// Reserved for local use (LOG_LOCAL3).
    Local3 = libc::LOG_LOCAL3,
    /// Reserved for local use (LOG_LOCAL4).
    Local4 = libc::LOG_LOCAL4,
    /// Reserved for local use (LOG_LOCAL5).
    Local5 = libc::LOG_LOCAL5,
    /// Reserved for local use (LOG_LOCAL6).
    Local6 = libc::LOG_LOCAL6,
    /// Reserved for local use (LOG_LOCAL7).
    Local7 = libc::LOG_LOCAL7,
}

impl SyslogFacility {
    /// Parses a case-insensitive facility name such as `"daemon"` or `"local3"`.
    ///
    /// # Examples
    ///
    /// ```
    /// # #[cfg(unix)]
    /// # {
    /// use logging_sink::syslog::SyslogFacility;
    ///
    /// assert_eq!(SyslogFacility::from_name("LOCAL3"), Some(SyslogFacility::Local3));
    /// assert_eq!(SyslogFacility::from_name("unknown"), None);
    /// # }
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "kern" => Some(Self::Kern),
            "user" => Some(Self::User),
            "mail" => Some(Self::Mail),
            "daemon" => Some(Self::Daemon),
            "auth" => Some(Self::Auth),
            "syslog" => Some(Self::Syslog),
            "cron" => Some(Self::Cron),
            "local0" => Some(Self::Local0),
            "local1" => Some(Self::Local1),
            "local2" => Some(Self::Local2),
            "local3" => Some(Self::Local3),
            "local4" => Some(Self::Local4),
            "local5" => Some(Self::Local5),
            "local6" => Some(Self::Local6),
            "local7" => Some(Self::Local7),
            _ => None,
        }
    }

    /// Returns the lower-case facility name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kern => "kern",
            Self::User => "user",
            Self::Mail => "mail",
            Self::Daemon => "daemon",
            Self::Auth => "auth",
            Self::Syslog => "syslog",
            Self::Cron => "cron",
            Self::Local0 => "local0",
            Self::Local1 => "local1",
            Self::Local2 => "local2",
            Self::Local3 => "local3",
            Self::Local4 => "local4",
            Self::Local5 => "local5",
            Self::Local6 => "local6",
            Self::Local7 => "local7",
        }
    }
}

impl fmt::Display for SyslogFacility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Syslog severities used for log records.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(i32)]
pub enum SyslogPriority {
    /// Critical conditions (LOG_CRIT).
    Critical = libc::LOG_CRIT,
    /// Warning conditions (LOG_WARNING).
    Warning = libc::LOG_WARNING,
    /// Informational messages (LOG_INFO).
    Info = libc::LOG_INFO,
    /// Debug-level messages (LOG_DEBUG).
    Debug = libc::LOG_DEBUG,
}

impl SyslogPriority {
    /// Maps a verbosity level onto the syslog severity of its band.
    #[must_use]
    pub const fn for_level(level: Level) -> Self {
        if level >= FATAL {
            Self::Critical
        } else if level >= WARN {
            Self::Warning
        } else if level >= INFO {
            Self::Info
        } else {
            Self::Debug
        }
    }
}

/// Default ident passed to openlog(3).
pub const DEFAULT_SYSLOG_TAG: &str = "pipelog";

/// Facility and ident for a syslog connection.
///
/// ```
/// # #[cfg(unix)]
/// # {
/// use logging_sink::syslog::{SyslogConfig, SyslogFacility};
///
/// let config = SyslogConfig::new(SyslogFacility::Local5, "ingest");
/// assert_eq!(config.facility(), SyslogFacility::Local5);
/// assert_eq!(config.tag(), "ingest");
/// # }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyslogConfig {
    facility: SyslogFacility,
    tag: String,
}

impl SyslogConfig {
    /// Creates a configuration with the given facility and tag.
    pub fn new(facility: SyslogFacility, tag: impl Into<String>) -> Self {
        Self {
            facility,
            tag: tag.into(),
        }
    }

    /// Returns the configured facility.
    pub const fn facility(&self) -> SyslogFacility {
        self.facility
    }

    /// Returns the configured tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Opens the syslog connection and returns a sink writing to it.
    ///
    /// The connection is closed when the sink is dropped. syslog(3) keeps a
    /// single connection per process, so only one sink should be open at a
    /// time.
    pub fn open(&self) -> Result<SyslogSink, SinkError> {
        let ident =
            CString::new(self.tag.as_str()).map_err(|_| SinkError::InvalidTag(self.tag.clone()))?;

        // SAFETY: `ident` is a valid C string owned by the returned sink,
        // which calls closelog(3) before releasing it.
        unsafe {
            libc::openlog(ident.as_ptr(), libc::LOG_PID, self.facility as libc::c_int);
        }
        tracing::debug!(
            target: "logging_sink::syslog",
            facility = %self.facility,
            tag = %self.tag,
            "syslog opened"
        );

        Ok(SyslogSink { _ident: ident })
    }
}

impl Default for SyslogConfig {
    fn default() -> Self {
        Self::new(SyslogFacility::default(), DEFAULT_SYSLOG_TAG)
    }
}

/// Sink submitting each record to syslog(3).
///
/// ```no_run
/// # #[cfg(unix)]
/// # {
/// use logging::{Log, LogDestination, TextFormatter};
/// use logging::levels::WARN;
/// use logging_sink::syslog::{SyslogConfig, SyslogFacility};
/// use std::sync::Arc;
///
/// let sink = SyslogConfig::new(SyslogFacility::Daemon, "ingest").open().unwrap();
/// let mut root = Log::new("");
/// root.add_destination(Arc::new(LogDestination::new(sink, TextFormatter::brief(), WARN)));
/// root.warn("disk nearly full");
/// # }
/// ```
#[derive(Debug)]
pub struct SyslogSink {
    _ident: CString,
}

impl LogSink for SyslogSink {
    fn write_record(&self, record: &LogRecord, rendered: &str) -> io::Result<()> {
        let priority = SyslogPriority::for_level(record.level().unwrap_or(INFO));
        let message = CString::new(rendered)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;

        // SAFETY: openlog(3) ran when this sink was created; the format and
        // message are valid NUL-terminated strings.
        unsafe {
            libc::syslog(priority as libc::c_int, c"%s".as_ptr(), message.as_ptr());
        }
        Ok(())
    }
}

impl Drop for SyslogSink {
    fn drop(&mut self) {
        // SAFETY: closelog(3) has no preconditions.
        unsafe {
            libc::closelog();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging::levels::DEBUG;

    #[test]
    fn default_facility_is_user() {
        assert_eq!(SyslogFacility::default(), SyslogFacility::User);
        assert_eq!(SyslogConfig::default().tag(), DEFAULT_SYSLOG_TAG);
    }

    #[test]
    fn from_name_is_case_insensitive() {
        assert_eq!(SyslogFacility::from_name("DAEMON"), Some(SyslogFacility::Daemon));
        assert_eq!(SyslogFacility::from_name("Local0"), Some(SyslogFacility::Local0));
        assert_eq!(SyslogFacility::from_name("local8"), None);
        assert_eq!(SyslogFacility::from_name(""), None);
    }

    #[test]
    fn as_str_round_trips_with_from_name() {
        for facility in [
            SyslogFacility::Kern,
            SyslogFacility::User,
            SyslogFacility::Mail,
            SyslogFacility::Daemon,
            SyslogFacility::Auth,
            SyslogFacility::Syslog,
            SyslogFacility::Cron,
            SyslogFacility::Local0,
            SyslogFacility::Local3,
            SyslogFacility::Local7,
        ] {
            assert_eq!(SyslogFacility::from_name(facility.as_str()), Some(facility));
            assert_eq!(facility.to_string(), facility.as_str());
        }
    }

    #[test]
    fn facility_values_match_libc_constants() {
        assert_eq!(SyslogFacility::User as i32, libc::LOG_USER);
        assert_eq!(SyslogFacility::Daemon as i32, libc::LOG_DAEMON);
        assert_eq!(SyslogFacility::Local7 as i32, libc::LOG_LOCAL7);
    }

    #[test]
    fn levels_map_to_priorities() {
        assert_eq!(SyslogPriority::for_level(FATAL + 1), SyslogPriority::Critical);
        assert_eq!(SyslogPriority::for_level(WARN), SyslogPriority::Warning);
        assert_eq!(SyslogPriority::for_level(INFO), SyslogPriority::Info);
        assert_eq!(SyslogPriority::for_level(-1), SyslogPriority::Debug);
        assert_eq!(SyslogPriority::for_level(DEBUG), SyslogPriority::Debug);
        assert_eq!(SyslogPriority::Warning as i32, libc::LOG_WARNING);
    }

    #[test]
    fn tag_with_nul_is_rejected() {
        let config = SyslogConfig::new(SyslogFacility::User, "bad\0tag");
        assert!(matches!(config.open(), Err(SinkError::InvalidTag(_))));
    }

    #[test]
    fn open_and_write_do_not_fail() {
        let sink = SyslogConfig::new(SyslogFacility::User, "pipelog-tests")
            .open()
            .unwrap();
        let mut record = LogRecord::with_message("x");
        record.attach("k", 1);
        sink.write_record(&record, "syslog sink test message with % signs")
            .unwrap();
    }

    #[test]
    fn rendered_text_with_nul_is_rejected() {
        let sink = SyslogConfig::default().open().unwrap();
        let error = sink.write_record(&LogRecord::new(), "a\0b").unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }
}
