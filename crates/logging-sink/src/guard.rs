use logging::Log;

/// RAII guard that temporarily installs a default root Log.
///
/// Instances are created by [`ScreenLog::install_scoped`](crate::ScreenLog::install_scoped)
/// and [`DualLog::install_scoped`](crate::DualLog::install_scoped), or directly through
/// [`DefaultLogGuard::install`]. While the guard is alive, [`Log::root`] returns
/// the installed Log. Dropping the guard reinstates the previous default.
/// The guard implements [`Deref`](std::ops::Deref) to the installed Log.
///
/// Installing a default is a bootstrap step: use the guard at the top of
/// `main` or in a test, not while other threads are fetching the root.
#[must_use = "dropping the guard immediately restores the previous default"]
#[derive(Debug)]
pub struct DefaultLogGuard {
    installed: Log,
    previous: Option<Log>,
}

impl DefaultLogGuard {
    /// Installs `log` as the default root until the guard is dropped.
    pub fn install(log: Log) -> Self {
        let previous = Log::set_default(log.clone());
        Self {
            installed: log,
            previous: Some(previous),
        }
    }

    /// Returns the Log that will be restored when the guard is dropped.
    #[must_use]
    pub const fn previous(&self) -> Option<&Log> {
        self.previous.as_ref()
    }

    /// Consumes the guard without restoring the previous default.
    ///
    /// The installed Log stays the default and is returned.
    ///
    /// ```
    /// use logging::Log;
    /// use logging_sink::DefaultLogGuard;
    ///
    /// let mut quiet = Log::new("");
    /// quiet.add_preamble_property("MODE", "quiet");
    /// let original = DefaultLogGuard::install(quiet).into_previous();
    ///
    /// assert!(Log::root().preamble_property("MODE").is_some());
    /// Log::set_default(original);
    /// ```
    pub fn into_previous(mut self) -> Log {
        self.previous.take().unwrap_or_else(Log::root)
    }

    /// Consumes the guard, keeping the installed Log as the default.
    pub fn keep(mut self) -> Log {
        self.previous = None;
        self.installed.clone()
    }
}

impl Drop for DefaultLogGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            Log::set_default(previous);
        }
    }
}

impl std::ops::Deref for DefaultLogGuard {
    type Target = Log;

    fn deref(&self) -> &Self::Target {
        &self.installed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_lock::DEFAULT_ROOT;
    use logging::PropertyValue;
    use std::sync::PoisonError;

    fn tagged(tag: &str) -> Log {
        let mut log = Log::new("");
        log.add_preamble_property("TAG", tag);
        log
    }

    fn root_tag() -> Option<PropertyValue> {
        Log::root().preamble_property("TAG").cloned()
    }

    #[test]
    fn drop_restores_previous_default() {
        let _serial = DEFAULT_ROOT.lock().unwrap_or_else(PoisonError::into_inner);
        let before = root_tag();
        {
            let guard = DefaultLogGuard::install(tagged("scoped"));
            assert_eq!(root_tag(), Some(PropertyValue::from("scoped")));
            assert_eq!(guard.name(), "");
            assert!(guard.previous().is_some());
        }
        assert_eq!(root_tag(), before);
    }

    #[test]
    fn keep_leaves_installed_default() {
        let _serial = DEFAULT_ROOT.lock().unwrap_or_else(PoisonError::into_inner);
        let original = Log::root();
        let kept = DefaultLogGuard::install(tagged("kept")).keep();
        assert_eq!(kept.preamble_property("TAG"), Some(&PropertyValue::from("kept")));
        assert_eq!(root_tag(), Some(PropertyValue::from("kept")));
        Log::set_default(original);
    }

    #[test]
    fn nested_guards_unwind_in_order() {
        let _serial = DEFAULT_ROOT.lock().unwrap_or_else(PoisonError::into_inner);
        let before = root_tag();
        {
            let _outer = DefaultLogGuard::install(tagged("outer"));
            {
                let _inner = DefaultLogGuard::install(tagged("inner"));
                assert_eq!(root_tag(), Some(PropertyValue::from("inner")));
            }
            assert_eq!(root_tag(), Some(PropertyValue::from("outer")));
        }
        assert_eq!(root_tag(), before);
    }
}
