//! Process-wide record of what the start routine found.
//!
//! Written exactly once, by the start routine, after the vectors have been
//! copied and the auxiliary vector located and before `main` runs. Read-only
//! afterwards and never torn down; process exit reclaims it.

use core::ffi::{CStr, c_char};

use launchpad_abi::{
    AT_BASE, AT_CLKTCK, AT_EGID, AT_ENTRY, AT_EUID, AT_EXECFN, AT_GID, AT_HWCAP, AT_HWCAP2,
    AT_PAGESZ, AT_PHDR, AT_PHENT, AT_PHNUM, AT_PLATFORM, AT_RANDOM, AT_SECURE, AT_SYSINFO_EHDR,
    AT_UID, HwCap, PAGE_SIZE,
};
use launchpad_lib::klog_warn;
use spin::Once;

use crate::args::MainArgs;
use crate::auxv::AuxVector;

/// Everything published before `main` is dispatched.
#[derive(Clone, Copy, Debug)]
pub struct ProcessEntry {
    pub auxv: AuxVector<'static>,
    pub args: MainArgs<'static>,
}

// SAFETY: both fields are read-only views of memory that lives, unmodified
// by this crate, until the process exits.
unsafe impl Send for ProcessEntry {}
unsafe impl Sync for ProcessEntry {}

/// Single-writer, many-reader holder for [`ProcessEntry`].
pub struct EntryState {
    entry: Once<ProcessEntry>,
}

impl EntryState {
    pub const fn new() -> Self {
        Self { entry: Once::new() }
    }

    /// Record the entry.
    ///
    /// Returns `None` if a record was already published; the first one stays.
    pub fn publish(&self, entry: ProcessEntry) -> Option<&ProcessEntry> {
        let mut fresh = false;
        let published = self.entry.call_once(|| {
            fresh = true;
            entry
        });
        if !fresh {
            klog_warn!("launchpad: process entry state already published");
            return None;
        }
        Some(published)
    }

    #[inline]
    pub fn get(&self) -> Option<&ProcessEntry> {
        self.entry.get()
    }

    /// Auxv lookup; 0 for an absent tag or before publication.
    pub fn getauxval(&self, a_type: usize) -> usize {
        self.get().map_or(0, |entry| entry.auxv.lookup(a_type))
    }
}

impl Default for EntryState {
    fn default() -> Self {
        Self::new()
    }
}

/// The state of this process.
pub static PROCESS: EntryState = EntryState::new();

/// Value of auxiliary vector entry `a_type`, or 0 when absent.
pub fn getauxval(a_type: usize) -> usize {
    PROCESS.getauxval(a_type)
}

macro_rules! aux_accessors {
    ($($name:ident => $tag:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("Value of `", stringify!($tag), "`, or 0 when absent.")]
                #[inline]
                pub fn [<aux_ $name>]() -> usize {
                    getauxval($tag)
                }
            )*
        }
    };
}

aux_accessors! {
    phdr => AT_PHDR,
    phent => AT_PHENT,
    phnum => AT_PHNUM,
    pagesz => AT_PAGESZ,
    base => AT_BASE,
    entry => AT_ENTRY,
    uid => AT_UID,
    euid => AT_EUID,
    gid => AT_GID,
    egid => AT_EGID,
    platform => AT_PLATFORM,
    hwcap => AT_HWCAP,
    clktck => AT_CLKTCK,
    secure => AT_SECURE,
    random => AT_RANDOM,
    hwcap2 => AT_HWCAP2,
    execfn => AT_EXECFN,
    sysinfo_ehdr => AT_SYSINFO_EHDR,
}

/// Page size reported by the loader, [`PAGE_SIZE`] if it reported none.
pub fn page_size() -> usize {
    match aux_pagesz() {
        0 => PAGE_SIZE,
        size => size,
    }
}

pub fn hwcap() -> HwCap {
    HwCap::from_bits_retain(aux_hwcap())
}

pub fn argc() -> usize {
    PROCESS.get().map_or(0, |entry| entry.args.argc())
}

pub fn argv() -> *const *const c_char {
    PROCESS
        .get()
        .map_or(core::ptr::null(), |entry| entry.args.argv_ptr())
}

pub fn envp() -> *const *const c_char {
    PROCESS
        .get()
        .map_or(core::ptr::null(), |entry| entry.args.envp_ptr())
}

pub fn get_arg(index: usize) -> Option<&'static CStr> {
    PROCESS.get()?.args.arg(index)
}

pub fn get_env(name: &[u8]) -> Option<&'static [u8]> {
    PROCESS.get()?.args.env(name)
}
