//! What the start routine needs from the host operating system.

use core::ffi::c_int;
use core::fmt::{self, Write};

use launchpad_lib::FdWriter;
use launchpad_lib::sys::{STDOUT_FILENO, sys_exit_group, sys_write_all, trap};

use crate::error::{StartError, fatal};

/// Descriptor [`LinuxPlatform`] writes diagnostics to.
pub const DIAGNOSTIC_FD: i32 = STDOUT_FILENO;

/// Process-level services used once `main` has been resolved.
///
/// Embedders that do not run directly on Linux supply their own
/// implementation instead of relying on the raw syscalls.
pub trait Platform {
    /// Write one diagnostic line to standard output.
    fn write_diagnostic(&self, args: fmt::Arguments<'_>);

    /// Terminate the process with `status`.
    fn exit(&self, status: c_int) -> !;

    /// Terminate the process abnormally.
    fn abort(&self) -> !;
}

/// Raw Linux syscalls, no libc.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinuxPlatform;

impl Platform for LinuxPlatform {
    fn write_diagnostic(&self, args: fmt::Arguments<'_>) {
        let _ = FdWriter(DIAGNOSTIC_FD).write_fmt(args);
        sys_write_all(DIAGNOSTIC_FD, b"\n");
    }

    fn exit(&self, status: c_int) -> ! {
        sys_exit_group(status);
        fatal(self, StartError::ExitReturned { status })
    }

    fn abort(&self) -> ! {
        trap()
    }
}
