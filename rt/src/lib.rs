//! launchpad - process entry trampoline.
//!
//! Turns the single stack pointer the loader hands to `_start` into a typed
//! call of the program's `main`:
//!
//! - [`stack`]: decode argc, argv and envp from the initial stack
//! - [`materialize`]: copy argv and envp into buffers the program owns
//! - [`auxv`]: locate the auxiliary vector and answer lookups on it
//! - [`state`]: the once-written process entry state and `getauxval`
//! - [`dispatch`]: call `main` with the convention selected by the ABI tag
//! - [`crt0`]: the start routine tying these together, and [`entry!`]

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod args;
pub mod auxv;
pub mod crt0;
pub mod dispatch;
pub mod error;
pub mod materialize;
pub mod platform;
pub mod stack;
pub mod state;

#[cfg(feature = "c-abi")]
pub mod ffi;

pub use args::MainArgs;
pub use auxv::{AuxIter, AuxVector};
pub use crt0::{crt0_start, start_with};
pub use dispatch::{DispatchState, Dispatcher, EntryHook, EntryPoint, StandardMain, WordMain};
pub use error::{StartError, VectorKind, fatal};
pub use launchpad_abi::{AuxEntry, AuxRecord, HwCap, MainAbi};
pub use materialize::{OwnedVector, materialize_argv, materialize_envp};
pub use platform::{LinuxPlatform, Platform};
pub use stack::{CStrPtr, StackLayout};
pub use state::{
    EntryState, PROCESS, ProcessEntry, argc, argv, aux_base, aux_clktck, aux_egid, aux_entry,
    aux_euid, aux_execfn, aux_gid, aux_hwcap, aux_hwcap2, aux_pagesz, aux_phdr, aux_phent,
    aux_phnum, aux_platform, aux_random, aux_secure, aux_sysinfo_ehdr, aux_uid, envp, get_arg,
    get_env, getauxval, hwcap, page_size,
};
