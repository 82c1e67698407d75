//! Start-path failures.
//!
//! Every error here is fatal. There is no caller to hand a `Result` back to
//! before `main` runs, so [`fatal`] reports the error through the platform and
//! aborts.

use core::ffi::c_int;
use core::fmt;

use launchpad_lib::klog_error;

use crate::platform::Platform;

/// Which loader vector a buffer was being copied from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorKind {
    Argv,
    Envp,
}

impl VectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VectorKind::Argv => "argv",
            VectorKind::Envp => "envp",
        }
    }
}

impl fmt::Display for VectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartError {
    /// The owned copy of argv or envp could not be allocated.
    OutOfMemory { vector: VectorKind, slots: usize },
    /// Process exit came back to its caller.
    ExitReturned { status: c_int },
    /// The entry state was already published by an earlier start.
    AlreadyStarted,
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // The only line the start path prints on standard output.
            StartError::OutOfMemory { .. } => write!(f, "not enough memory"),
            StartError::ExitReturned { status } => write!(f, "exit({}) returned", status),
            StartError::AlreadyStarted => write!(f, "process already started"),
        }
    }
}

/// Report `err` on the platform's diagnostic stream and abort.
#[cold]
pub fn fatal<P: Platform + ?Sized>(platform: &P, err: StartError) -> ! {
    match err {
        StartError::OutOfMemory { vector, slots } => {
            klog_error!("launchpad: cannot allocate {} slots for {}", slots, vector);
        }
        StartError::ExitReturned { status } => {
            klog_error!("launchpad: exit status {} was not delivered", status);
        }
        StartError::AlreadyStarted => {
            klog_error!("launchpad: start routine entered twice");
        }
    }
    platform.write_diagnostic(format_args!("{}", err));
    platform.abort()
}
