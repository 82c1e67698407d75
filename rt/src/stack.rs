//! Decoding of the initial process stack.
//!
//! The loader hands `_start` a pointer to this layout:
//!
//! ```text
//!   sp -> [argc]
//!         [argv0] .. [argvN-1] [NULL]
//!         [env0]  .. [envM-1]  [NULL]
//!         [auxv entries ...]   [AT_NULL, 0]
//! ```
//!
//! [`StackLayout::from_raw`] is the only place that does pointer arithmetic
//! over that region. Everything downstream works on the typed slices it
//! returns.

use core::ffi::c_char;
use core::slice;

/// Pointer to a NUL-terminated string owned by the loader.
pub type CStrPtr = *const c_char;

/// Typed view of the loader-provided initial stack.
///
/// Both slices include their trailing null entry, so `argv().len()` is
/// `argc + 1` and `envp().len()` is `envc + 1`.
#[derive(Clone, Copy, Debug)]
pub struct StackLayout<'a> {
    argc: usize,
    argv: &'a [CStrPtr],
    envp: &'a [CStrPtr],
}

impl<'a> StackLayout<'a> {
    /// Decode the initial stack rooted at `sp`.
    ///
    /// # Safety
    ///
    /// `sp` must point at a complete loader layout (argc, null-terminated
    /// argv, null-terminated envp, `AT_NULL`-terminated auxv) that stays
    /// valid and unmodified for `'a`. Nothing is checked.
    pub unsafe fn from_raw(sp: *const usize) -> Self {
        // SAFETY: caller guarantees the layout described above.
        unsafe {
            let argc = *sp;
            let argv_ptr = sp.add(1) as *const CStrPtr;
            let argv = slice::from_raw_parts(argv_ptr, argc + 1);

            let envp_ptr = argv_ptr.add(argc + 1);
            let envc = count_entries(envp_ptr);
            let envp = slice::from_raw_parts(envp_ptr, envc + 1);

            Self { argc, argv, envp }
        }
    }

    #[inline]
    pub fn argc(&self) -> usize {
        self.argc
    }

    #[inline]
    pub fn envc(&self) -> usize {
        self.envp.len() - 1
    }

    /// Argument pointers including the null terminator.
    #[inline]
    pub fn argv(&self) -> &'a [CStrPtr] {
        self.argv
    }

    /// Environment pointers including the null terminator.
    #[inline]
    pub fn envp(&self) -> &'a [CStrPtr] {
        self.envp
    }

    /// Address of the first word after the original envp terminator.
    #[inline]
    pub fn envp_end(&self) -> *const usize {
        self.envp.as_ptr_range().end as *const usize
    }
}

/// Number of non-null entries before the first null.
///
/// # Safety
///
/// `ptr` must point at a null-terminated pointer array.
unsafe fn count_entries(ptr: *const CStrPtr) -> usize {
    let mut n = 0;
    // SAFETY: the array is null-terminated per the caller's contract.
    while unsafe { !(*ptr.add(n)).is_null() } {
        n += 1;
    }
    n
}

#[cfg(test)]
pub(crate) mod testing {
    //! Synthetic initial stacks for host-side tests.

    use std::ffi::CString;
    use std::vec::Vec;

    use launchpad_abi::{AT_NULL, AuxEntry};

    /// Owns the strings and the word array of a fake loader stack.
    pub struct FakeStack {
        pub strings: Vec<CString>,
        pub words: Vec<usize>,
    }

    impl FakeStack {
        pub fn new(args: &[&str], env: &[&str], auxv: &[AuxEntry]) -> Self {
            let strings: Vec<CString> = args
                .iter()
                .chain(env.iter())
                .map(|s| CString::new(*s).unwrap())
                .collect();

            let mut words = Vec::new();
            words.push(args.len());
            for s in &strings[..args.len()] {
                words.push(s.as_ptr() as usize);
            }
            words.push(0);
            for s in &strings[args.len()..] {
                words.push(s.as_ptr() as usize);
            }
            words.push(0);
            for e in auxv {
                words.push(e.a_type);
                words.push(e.a_val);
            }
            words.push(AT_NULL);
            words.push(0);

            Self { strings, words }
        }

        pub fn sp(&self) -> *const usize {
            self.words.as_ptr()
        }

        /// Index in `words` of argv entry `i`.
        pub fn argv_slot(&self, i: usize) -> usize {
            1 + i
        }

        /// Index in `words` of envp entry `i`.
        pub fn envp_slot(&self, i: usize) -> usize {
            1 + self.words[0] + 1 + i
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeStack;
    use super::*;
    use launchpad_abi::{AT_PAGESZ, AuxEntry};
    use std::ffi::CStr;

    #[test]
    fn test_decode_args_and_env() {
        let stack = FakeStack::new(
            &["prog", "-v", "file"],
            &["HOME=/root", "TERM=dumb"],
            &[AuxEntry::new(AT_PAGESZ, 4096)],
        );
        let layout = unsafe { StackLayout::from_raw(stack.sp()) };

        assert_eq!(layout.argc(), 3);
        assert_eq!(layout.argv().len(), 4);
        assert!(layout.argv()[3].is_null());
        assert_eq!(unsafe { CStr::from_ptr(layout.argv()[1]) }, c"-v");

        assert_eq!(layout.envc(), 2);
        assert_eq!(layout.envp().len(), 3);
        assert!(layout.envp()[2].is_null());
        assert_eq!(unsafe { CStr::from_ptr(layout.envp()[0]) }, c"HOME=/root");
    }

    #[test]
    fn test_decode_empty_environment() {
        let stack = FakeStack::new(&["prog"], &[], &[]);
        let layout = unsafe { StackLayout::from_raw(stack.sp()) };

        assert_eq!(layout.argc(), 1);
        assert_eq!(layout.envc(), 0);
        assert_eq!(layout.envp().len(), 1);
        assert!(layout.envp()[0].is_null());
    }

    #[test]
    fn test_envp_end_follows_terminator() {
        let stack = FakeStack::new(&["a", "b"], &["X=1"], &[]);
        let layout = unsafe { StackLayout::from_raw(stack.sp()) };

        // argc, 2 args, null, 1 env, null
        let expected = unsafe { stack.sp().add(1 + 2 + 1 + 1 + 1) };
        assert_eq!(layout.envp_end(), expected);
    }
}
