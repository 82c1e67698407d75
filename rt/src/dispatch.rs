//! Calling the user entry point with the convention it was built for.
//!
//! The tag fixed at link time is decoded into a [`MainAbi`]. The embedding
//! host resolves that ABI to a typed [`EntryPoint`] through its
//! [`EntryHook`], and the dispatcher calls it and forwards the result to
//! process exit. Adding a convention means adding a variant to both enums and
//! an arm to [`EntryPoint::invoke`]; the existing arms do not change.

use core::ffi::{c_int, c_long};

use launchpad_abi::MainAbi;
use launchpad_lib::{klog_debug, klog_warn};

use crate::args::MainArgs;
use crate::platform::Platform;
use crate::stack::CStrPtr;

/// `int main(int argc, char **argv, char **envp)`
pub type StandardMain = extern "C" fn(c_int, *const CStrPtr, *const CStrPtr) -> c_int;

/// `long main(long argc, char **argv)`
pub type WordMain = extern "C" fn(c_long, *const CStrPtr) -> c_long;

/// A user entry point together with the signature it must be called with.
#[derive(Clone, Copy, Debug)]
pub enum EntryPoint {
    Standard(StandardMain),
    Word(WordMain),
}

impl EntryPoint {
    pub const fn abi(&self) -> MainAbi {
        match self {
            EntryPoint::Standard(_) => MainAbi::Standard,
            EntryPoint::Word(_) => MainAbi::Word,
        }
    }

    /// Call the entry point and return what becomes the exit status.
    ///
    /// A word-sized result is truncated to `c_int`, as the kernel would.
    pub fn invoke(&self, args: &MainArgs<'_>) -> c_int {
        match *self {
            EntryPoint::Standard(main) => {
                main(args.argc() as c_int, args.argv_ptr(), args.envp_ptr())
            }
            EntryPoint::Word(main) => main(args.argc() as c_long, args.argv_ptr()) as c_int,
        }
    }
}

/// Host-side registration of the user entry point.
pub trait EntryHook {
    /// Entry point to call for a program linked with `abi`.
    fn resolve(&self, abi: MainAbi) -> EntryPoint;
}

/// A single registered entry point is used whatever the tag says: the tag
/// does not pick the signature, the registered variant does.
impl EntryHook for EntryPoint {
    fn resolve(&self, abi: MainAbi) -> EntryPoint {
        if self.abi() != abi {
            klog_warn!(
                "launchpad: {} entry registered, tag asked for {}",
                self.abi(),
                abi
            );
        }
        *self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchState {
    Start,
    Dispatched,
    Terminated,
}

/// One-shot driver from `Start` through `Dispatched` to `Terminated`.
#[derive(Debug)]
pub struct Dispatcher {
    tag: u32,
    abi: MainAbi,
    state: DispatchState,
}

impl Dispatcher {
    pub fn new(tag: u32) -> Self {
        let abi = MainAbi::from_tag(tag);
        if !MainAbi::is_known_tag(tag) {
            klog_debug!("launchpad: unknown ABI tag {}, using {}", tag, abi);
        }
        Self {
            tag,
            abi,
            state: DispatchState::Start,
        }
    }

    #[inline]
    pub fn tag(&self) -> u32 {
        self.tag
    }

    #[inline]
    pub fn abi(&self) -> MainAbi {
        self.abi
    }

    #[inline]
    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Resolve and call the entry point, returning its exit status.
    pub fn dispatch<H>(&mut self, hook: &H, args: &MainArgs<'_>) -> c_int
    where
        H: EntryHook + ?Sized,
    {
        debug_assert_eq!(self.state, DispatchState::Start);

        let entry = hook.resolve(self.abi);
        klog_debug!(
            "launchpad: dispatching {} main, argc={}",
            entry.abi(),
            args.argc()
        );
        self.state = DispatchState::Dispatched;
        entry.invoke(args)
    }

    /// Forward `status` to process exit.
    pub fn terminate<P>(&mut self, platform: &P, status: c_int) -> !
    where
        P: Platform + ?Sized,
    {
        debug_assert_eq!(self.state, DispatchState::Dispatched);

        klog_debug!("launchpad: main returned {}", status);
        self.state = DispatchState::Terminated;
        platform.exit(status)
    }

    pub fn run<H, P>(mut self, hook: &H, platform: &P, args: &MainArgs<'_>) -> !
    where
        H: EntryHook + ?Sized,
        P: Platform + ?Sized,
    {
        let status = self.dispatch(hook, args);
        self.terminate(platform, status)
    }
}
