//! launchpad support library: logging, start-path configuration and the raw
//! syscalls both need before libc is available.

#![cfg_attr(not(test), no_std)]

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
compile_error!("launchpad supports x86_64 and aarch64 Linux targets");

pub mod config;
pub mod klog;
pub mod string;
pub mod sys;

pub use config::{StartConfig, config_from_env, parse_bool};
pub use klog::{
    FdWriter, KlogBackend, KlogLevel, is_enabled_level, klog_get_level, klog_init,
    klog_register_backend, klog_set_level,
};
pub use string::{cstr_from_ptr, env_value};
