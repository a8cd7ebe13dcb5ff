//! Editor options — tunables with defaults and environment overrides.
//!
//! | Field          | Default | Environment       |
//! |----------------|---------|-------------------|
//! | `tab_stop`     | 8       | `KILO_TABSTOP`    |
//! | `read_timeout` | 100 ms  | `KILO_TIMEOUT_MS` |
//! | `quit_key`     | Ctrl-Q  | —                 |
//!
//! Precedence is defaults, then environment. Values that don't parse, that
//! are zero, or a tab stop above [`MAX_TAB_STOP`] are ignored with a
//! warning so a typo in the shell profile never stops the editor from
//! starting.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use kilo_term::input::ctrl;

/// Default tab stop width in columns.
pub const DEFAULT_TAB_STOP: usize = 8;

/// Widest accepted tab stop. Each tab renders to at most this many spaces.
pub const MAX_TAB_STOP: usize = 64;

/// Default wait for each raw byte read.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Tabs render up to the next multiple of this column.
    pub tab_stop: usize,

    /// How long a single byte read waits before reporting a timeout. Also
    /// bounds how long a lone ESC takes to become the Escape key.
    pub read_timeout: Duration,

    /// Byte that quits the editor.
    pub quit_key: u8,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tab_stop: DEFAULT_TAB_STOP,
            read_timeout: DEFAULT_READ_TIMEOUT,
            quit_key: ctrl(b'q'),
        }
    }
}

impl Options {
    /// Defaults with overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let mut options = Self::default();
        options.apply_vars(|name| env::var(name).ok());
        options
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("KILO_TABSTOP") {
            match parse_positive(&val).filter(|n| *n <= MAX_TAB_STOP) {
                Some(n) => self.tab_stop = n,
                None => log::warn!("ignoring KILO_TABSTOP={val:?}: expected an integer in 1..={MAX_TAB_STOP}"),
            }
        }
        if let Some(val) = lookup("KILO_TIMEOUT_MS") {
            match parse_positive(&val) {
                Some(ms) => self.read_timeout = Duration::from_millis(ms),
                None => log::warn!("ignoring KILO_TIMEOUT_MS={val:?}: expected a positive integer"),
            }
        }
    }
}

fn parse_positive<T: FromStr + PartialEq + Default>(val: &str) -> Option<T> {
    val.trim().parse().ok().filter(|n| *n != T::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_vars(vars: &[(&str, &str)]) -> Options {
        let mut options = Options::default();
        options.apply_vars(|name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v).to_string())
        });
        options
    }

    #[test]
    fn defaults() {
        let options = Options::default();
        assert_eq!(options.tab_stop, 8);
        assert_eq!(options.read_timeout, Duration::from_millis(100));
        assert_eq!(options.quit_key, 0x11);
    }

    #[test]
    fn no_vars_keeps_defaults() {
        assert_eq!(with_vars(&[]), Options::default());
    }

    #[test]
    fn tab_stop_override() {
        assert_eq!(with_vars(&[("KILO_TABSTOP", "4")]).tab_stop, 4);
        assert_eq!(with_vars(&[("KILO_TABSTOP", " 2 ")]).tab_stop, 2);
    }

    #[test]
    fn timeout_override() {
        let options = with_vars(&[("KILO_TIMEOUT_MS", "250")]);
        assert_eq!(options.read_timeout, Duration::from_millis(250));
    }

    #[test]
    fn invalid_values_are_ignored() {
        let options = with_vars(&[("KILO_TABSTOP", "0"), ("KILO_TIMEOUT_MS", "soon")]);
        assert_eq!(options, Options::default());
    }

    #[test]
    fn tab_stop_upper_bound() {
        assert_eq!(with_vars(&[("KILO_TABSTOP", "64")]).tab_stop, MAX_TAB_STOP);
        assert_eq!(with_vars(&[("KILO_TABSTOP", "65")]).tab_stop, DEFAULT_TAB_STOP);
        let max = usize::MAX.to_string();
        assert_eq!(with_vars(&[("KILO_TABSTOP", max.as_str())]).tab_stop, DEFAULT_TAB_STOP);
    }
}
