//! launchpad loader/process ABI types
//!
//! Canonical definitions shared by the start routine and anything that reads
//! what the loader left on the initial stack. Having one source of truth keeps
//! the record layout and tag values from drifting between crates.
//!
//! All record types in this crate are `#[repr(C)]` for ABI stability.

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

pub mod auxv;
pub mod entry;
pub mod hwcap;

/// Page size assumed when the loader does not report `AT_PAGESZ`.
pub const PAGE_SIZE: usize = 0x1000;

pub use auxv::*;
pub use entry::MainAbi;
pub use hwcap::HwCap;
