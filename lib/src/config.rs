//! Start-path configuration read from the environment block.
//!
//! The start routine has no files and no argument parser, so its knobs are
//! plain `KEY=value` environment entries, scanned once after the environment
//! has been copied:
//!
//! | Entry | Effect |
//! |-------|--------|
//! | `LAUNCHPAD_LOG=<level>` | klog level (`error`, `warn`, `info`, `debug`, `trace`) |
//! | `LAUNCHPAD_TRACE=<bool>` | dump argv, envp and auxv at trace level before `main` |
//!
//! Unrecognised values leave the default in place.

use crate::klog::{DEFAULT_LEVEL, KlogLevel};
use crate::string::env_value;

pub const LOG_VAR: &[u8] = b"LAUNCHPAD_LOG";
pub const TRACE_VAR: &[u8] = b"LAUNCHPAD_TRACE";

const DEFAULT_TRACE_VECTORS: bool = false;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartConfig {
    pub log_level: KlogLevel,
    pub trace_vectors: bool,
}

impl Default for StartConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LEVEL,
            trace_vectors: DEFAULT_TRACE_VECTORS,
        }
    }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("on")
        || value.eq_ignore_ascii_case("true")
        || value.eq_ignore_ascii_case("yes")
        || value.eq_ignore_ascii_case("enabled")
        || value == "1"
    {
        Some(true)
    } else if value.eq_ignore_ascii_case("off")
        || value.eq_ignore_ascii_case("false")
        || value.eq_ignore_ascii_case("no")
        || value.eq_ignore_ascii_case("disabled")
        || value == "0"
    {
        Some(false)
    } else {
        None
    }
}

/// Build a [`StartConfig`] from `KEY=value` environment entries.
///
/// Later entries win over earlier ones. Tracing raises the level to trace
/// whatever `LAUNCHPAD_LOG` says, in any order.
pub fn config_from_env<'a, I>(entries: I) -> StartConfig
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut cfg = StartConfig::default();
    for entry in entries {
        if let Some(value) = env_str(entry, LOG_VAR) {
            if let Some(level) = KlogLevel::parse(value) {
                cfg.log_level = level;
            }
        } else if let Some(value) = env_str(entry, TRACE_VAR) {
            if let Some(trace) = parse_bool(value) {
                cfg.trace_vectors = trace;
            }
        }
    }
    if cfg.trace_vectors {
        cfg.log_level = KlogLevel::Trace;
    }
    cfg
}

fn env_str<'a>(entry: &'a [u8], name: &[u8]) -> Option<&'a str> {
    env_value(entry, name).and_then(|v| core::str::from_utf8(v).ok())
}
