//! The start routine: from the loader's stack pointer to process exit.
//!
//! Order of operations:
//!
//! 1. decode argc/argv/envp from the initial stack
//! 2. copy argv and envp into owned buffers (fatal on allocation failure)
//! 3. locate the auxiliary vector after the original envp
//! 4. publish the process entry state
//! 5. apply `LAUNCHPAD_*` configuration
//! 6. dispatch to `main` and exit with its result

use launchpad_abi::aux_type_name;
use launchpad_lib::{
    KlogLevel, StartConfig, config_from_env, is_enabled_level, klog_set_level, klog_trace,
};

use crate::args::MainArgs;
use crate::auxv::AuxVector;
use crate::dispatch::{Dispatcher, EntryHook};
use crate::error::{StartError, fatal};
use crate::materialize::{materialize_argv, materialize_envp};
use crate::platform::Platform;
use crate::stack::StackLayout;
use crate::state::{EntryState, PROCESS, ProcessEntry};

/// Entry from `_start`.
///
/// # Safety
///
/// `sp` must be the initial stack pointer the loader handed to `_start`, and
/// this must be the only call in the process.
pub unsafe fn crt0_start<H, P>(sp: *const usize, tag: u32, hook: &H, platform: &P) -> !
where
    H: EntryHook + ?Sized,
    P: Platform + ?Sized,
{
    // SAFETY: forwarded from the caller.
    unsafe { start_with(&PROCESS, sp, tag, hook, platform) }
}

/// [`crt0_start`] against an explicit state slot.
///
/// A slot that already holds a published entry is fatal: `main` never runs
/// with another start's vectors.
///
/// # Safety
///
/// `sp` must point at a complete loader layout that outlives the process.
pub unsafe fn start_with<H, P>(
    state: &EntryState,
    sp: *const usize,
    tag: u32,
    hook: &H,
    platform: &P,
) -> !
where
    H: EntryHook + ?Sized,
    P: Platform + ?Sized,
{
    // SAFETY: the caller vouches for the layout and its lifetime.
    let layout: StackLayout<'static> = unsafe { StackLayout::from_raw(sp) };
    klog_trace!(
        "launchpad: initial stack at {:p}, argc={} envc={}",
        sp,
        layout.argc(),
        layout.envc()
    );

    let args = match materialize(&layout) {
        Ok(args) => args,
        Err(err) => fatal(platform, err),
    };

    let auxv = AuxVector::locate(&layout);
    let Some(entry) = state.publish(ProcessEntry { auxv, args }) else {
        fatal(platform, StartError::AlreadyStarted)
    };

    let config = config_from_env(entry.args.env_entries());
    apply_config(&config, entry);

    Dispatcher::new(tag).run(hook, platform, &entry.args)
}

fn materialize(layout: &StackLayout<'static>) -> Result<MainArgs<'static>, StartError> {
    let argv = materialize_argv(layout)?.leak();
    let envp = materialize_envp(layout)?.leak();
    // SAFETY: both copies keep the loader's terminators and string pointers.
    Ok(unsafe { MainArgs::new(argv, envp) })
}

fn apply_config(config: &StartConfig, entry: &ProcessEntry) {
    klog_set_level(config.log_level);
    if !config.trace_vectors || !is_enabled_level(KlogLevel::Trace) {
        return;
    }

    for (i, arg) in entry.args.args().enumerate() {
        klog_trace!("launchpad: argv[{}] = {:?}", i, arg);
    }
    for (i, var) in entry.args.env_entries().enumerate() {
        // Entries are shown as text when they are valid UTF-8.
        match core::str::from_utf8(var) {
            Ok(text) => klog_trace!("launchpad: envp[{}] = {}", i, text),
            Err(_) => klog_trace!("launchpad: envp[{}] = {:?}", i, var),
        }
    }
    for aux in entry.auxv.iter() {
        klog_trace!(
            "launchpad: auxv {} = {:#x}",
            aux_type_name(aux.a_type),
            aux.a_val
        );
    }
}

/// Emit the process entry symbol `_start` for a user `main`.
///
/// ```ignore
/// extern "C" fn main(argc: c_int, argv: *const *const c_char, envp: *const *const c_char) -> c_int {
///     0
/// }
/// launchpad_rt::entry!(main);
///
/// extern "C" fn word_main(argc: c_long, argv: *const *const c_char) -> c_long {
///     0
/// }
/// launchpad_rt::entry!(word: word_main);
/// ```
///
/// The generated `_start` passes the initial stack pointer and the tag of the
/// chosen convention to [`crt0_start`] with the raw Linux platform.
#[macro_export]
macro_rules! entry {
    (@emit $entry:expr) => {
        static __LAUNCHPAD_ENTRY: $crate::EntryPoint = $entry;

        extern "C" fn __launchpad_start(sp: *const usize) -> ! {
            // SAFETY: called once, from `_start`, with the loader's stack.
            unsafe {
                $crate::crt0_start(
                    sp,
                    __LAUNCHPAD_ENTRY.abi().tag(),
                    &__LAUNCHPAD_ENTRY,
                    &$crate::LinuxPlatform,
                )
            }
        }

        #[cfg(target_arch = "x86_64")]
        #[unsafe(naked)]
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn _start() -> ! {
            // Clear the frame pointer, pass the stack pointer, align the stack
            // and call into Rust. If we come back, fault.
            ::core::arch::naked_asm!(
                "xor rbp, rbp",
                "mov rdi, rsp",
                "and rsp, -16",
                "call {entry}",
                "ud2",
                entry = sym __launchpad_start,
            )
        }

        #[cfg(target_arch = "aarch64")]
        #[unsafe(naked)]
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn _start() -> ! {
            ::core::arch::naked_asm!(
                "mov x29, xzr",
                "mov x30, xzr",
                "mov x0, sp",
                "bl {entry}",
                "udf #0",
                entry = sym __launchpad_start,
            )
        }
    };
    (word: $main:path) => {
        $crate::entry!(@emit $crate::EntryPoint::Word($main));
    };
    ($main:path) => {
        $crate::entry!(@emit $crate::EntryPoint::Standard($main));
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::EntryPoint;
    use crate::platform::testing::{Outcome, TestPlatform, run_to_end};
    use crate::stack::CStrPtr;
    use crate::stack::testing::FakeStack;
    use core::ffi::{c_int, c_long};
    use core::sync::atomic::{AtomicUsize, Ordering};
    use launchpad_abi::{AT_HWCAP, AT_PAGESZ, AuxEntry, MainAbi};
    use launchpad_lib::{klog_get_level, klog_init};
    use std::boxed::Box;
    use std::sync::{Mutex, MutexGuard};

    // Every start sets the global klog level from its environment.
    static KLOG_LEVEL: Mutex<()> = Mutex::new(());

    fn klog_level_lock() -> MutexGuard<'static, ()> {
        KLOG_LEVEL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    extern "C" fn main_42(_argc: c_int, _argv: *const CStrPtr, _envp: *const CStrPtr) -> c_int {
        42
    }

    extern "C" fn word_main_7(_argc: c_long, _argv: *const CStrPtr) -> c_long {
        7
    }

    static SEEN_ARGC: AtomicUsize = AtomicUsize::new(usize::MAX);

    extern "C" fn counting_main(argc: c_int, _argv: *const CStrPtr, _envp: *const CStrPtr) -> c_int {
        SEEN_ARGC.store(argc as usize, Ordering::SeqCst);
        argc
    }

    struct BothMains;

    impl EntryHook for BothMains {
        fn resolve(&self, abi: MainAbi) -> EntryPoint {
            match abi {
                MainAbi::Standard => EntryPoint::Standard(main_42),
                MainAbi::Word => EntryPoint::Word(word_main_7),
            }
        }
    }

    fn start_in(state: &EntryState, stack: &FakeStack, tag: u32, hook: &dyn EntryHook) -> Outcome {
        let platform = TestPlatform::new();
        run_to_end(|| unsafe { start_with(state, stack.sp(), tag, hook, &platform) })
    }

    fn start(stack: &FakeStack, tag: u32, hook: &dyn EntryHook) -> (Outcome, &'static EntryState) {
        let state: &'static EntryState = Box::leak(Box::new(EntryState::new()));
        let _level = klog_level_lock();
        let outcome = start_in(state, stack, tag, hook);
        (outcome, state)
    }

    extern "C" fn argc_main(argc: c_int, _argv: *const CStrPtr, _envp: *const CStrPtr) -> c_int {
        argc
    }

    #[test]
    fn test_start_standard_abi() {
        let stack = FakeStack::new(&["prog"], &["A=1"], &[]);
        let (outcome, _) = start(&stack, 0, &BothMains);
        assert_eq!(outcome, Outcome::Exited(42));
    }

    #[test]
    fn test_start_word_abi() {
        let stack = FakeStack::new(&["prog", "a"], &["A=1", "B=2"], &[]);
        let (outcome, _) = start(&stack, 1, &BothMains);
        assert_eq!(outcome, Outcome::Exited(7));
    }

    #[test]
    fn test_start_unknown_tag() {
        let stack = FakeStack::new(&["prog"], &[], &[]);
        let (outcome, _) = start(&stack, 99, &BothMains);
        assert_eq!(outcome, Outcome::Exited(42));
    }

    #[test]
    fn test_start_publishes_auxv_and_args() {
        let stack = FakeStack::new(
            &["prog", "x", "y"],
            &["HOME=/root"],
            &[AuxEntry::new(AT_PAGESZ, 4096), AuxEntry::new(AT_HWCAP, 0x178bfbff)],
        );
        let (outcome, state) = start(&stack, 0, &EntryPoint::Standard(counting_main));

        assert_eq!(outcome, Outcome::Exited(3));
        assert_eq!(SEEN_ARGC.load(Ordering::SeqCst), 3);

        let entry = state.get().unwrap();
        assert_eq!(state.getauxval(AT_PAGESZ), 4096);
        assert_eq!(state.getauxval(AT_HWCAP), 0x178bfbff);
        assert_eq!(entry.args.arg(2), Some(c"y"));
        assert_eq!(entry.args.env(b"HOME"), Some(b"/root".as_slice()));
        // argv handed to main is the copy, not the loader's array.
        assert_ne!(entry.args.argv_ptr(), unsafe { stack.sp().add(1) } as *const CStrPtr);
    }

    #[test]
    fn test_start_applies_env_config() {
        let stack = FakeStack::new(
            &["prog"],
            &["LAUNCHPAD_TRACE=off", "LAUNCHPAD_LOG=error"],
            &[AuxEntry::new(AT_PAGESZ, 4096)],
        );
        let state = EntryState::new();
        let _level = klog_level_lock();
        let outcome = start_in(&state, &stack, 0, &BothMains);
        let level = klog_get_level();
        klog_init();

        assert_eq!(outcome, Outcome::Exited(42));
        assert_eq!(level, KlogLevel::Error);
    }

    #[test]
    fn test_start_twice_on_one_state_aborts() {
        let first = FakeStack::new(&["prog"], &[], &[]);
        let second = FakeStack::new(&["prog", "a", "b", "c"], &[], &[]);
        let state = EntryState::new();
        let _level = klog_level_lock();

        let main = EntryPoint::Standard(argc_main);
        assert_eq!(start_in(&state, &first, 0, &main), Outcome::Exited(1));
        assert_eq!(start_in(&state, &second, 0, &main), Outcome::Aborted);
        assert_eq!(state.get().map(|entry| entry.args.argc()), Some(1));
    }
}
