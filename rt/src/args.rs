//! The argument and environment vectors as handed to `main`.

use core::ffi::{CStr, c_char};

use launchpad_lib::{cstr_from_ptr, env_value};

use crate::stack::CStrPtr;

/// Loaned view of the materialized `argv` and `envp`.
///
/// Both slices include their null terminator so that `argv_ptr()` and
/// `envp_ptr()` can be passed straight to a C-shaped `main`.
#[derive(Clone, Copy, Debug)]
pub struct MainArgs<'a> {
    argv: &'a [CStrPtr],
    envp: &'a [CStrPtr],
}

impl<'a> MainArgs<'a> {
    /// # Safety
    ///
    /// Both slices must end with a null entry, and every other entry must
    /// point at a NUL-terminated string valid for `'a`.
    pub const unsafe fn new(argv: &'a [CStrPtr], envp: &'a [CStrPtr]) -> Self {
        Self { argv, envp }
    }

    #[inline]
    pub fn argc(&self) -> usize {
        self.argv.len() - 1
    }

    #[inline]
    pub fn envc(&self) -> usize {
        self.envp.len() - 1
    }

    #[inline]
    pub fn argv_ptr(&self) -> *const *const c_char {
        self.argv.as_ptr()
    }

    #[inline]
    pub fn envp_ptr(&self) -> *const *const c_char {
        self.envp.as_ptr()
    }

    /// Argument `index`, or `None` past the end.
    pub fn arg(&self, index: usize) -> Option<&'a CStr> {
        let ptr = *self.argv[..self.argc()].get(index)?;
        // SAFETY: entries are valid C strings per `new`.
        unsafe { cstr_from_ptr(ptr) }
    }

    pub fn args(&self) -> impl Iterator<Item = &'a CStr> + use<'a> {
        let argv = self.argv;
        // SAFETY: entries are valid C strings per `new`.
        argv[..argv.len() - 1]
            .iter()
            .filter_map(|&p| unsafe { cstr_from_ptr(p) })
    }

    /// Raw `NAME=value` environment entries.
    pub fn env_entries(&self) -> impl Iterator<Item = &'a [u8]> + use<'a> {
        let envp = self.envp;
        // SAFETY: entries are valid C strings per `new`.
        envp[..envp.len() - 1]
            .iter()
            .filter_map(|&p| unsafe { cstr_from_ptr(p) })
            .map(CStr::to_bytes)
    }

    /// Value of the first environment entry named `name`.
    pub fn env(&self, name: &[u8]) -> Option<&'a [u8]> {
        self.env_entries().find_map(|entry| env_value(entry, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materialize::{materialize_argv, materialize_envp};
    use crate::stack::StackLayout;
    use crate::stack::testing::FakeStack;

    #[test]
    fn test_arg_and_env_lookup() {
        let stack = FakeStack::new(&["prog", "--fast"], &["HOME=/root", "LANG=C"], &[]);
        let layout = unsafe { StackLayout::from_raw(stack.sp()) };
        let argv = materialize_argv(&layout).unwrap();
        let envp = materialize_envp(&layout).unwrap();
        let args = unsafe { MainArgs::new(argv.as_slice(), envp.as_slice()) };

        assert_eq!(args.argc(), 2);
        assert_eq!(args.envc(), 2);
        assert_eq!(args.arg(1), Some(c"--fast"));
        assert_eq!(args.arg(2), None);
        assert_eq!(args.args().count(), 2);
        assert_eq!(args.env(b"LANG"), Some(b"C".as_slice()));
        assert_eq!(args.env(b"LAN"), None);
    }

    #[test]
    fn test_pointers_reach_terminators() {
        let stack = FakeStack::new(&["prog"], &[], &[]);
        let layout = unsafe { StackLayout::from_raw(stack.sp()) };
        let argv = materialize_argv(&layout).unwrap();
        let envp = materialize_envp(&layout).unwrap();
        let args = unsafe { MainArgs::new(argv.as_slice(), envp.as_slice()) };

        assert!(unsafe { (*args.argv_ptr().add(1)).is_null() });
        assert!(unsafe { (*args.envp_ptr()).is_null() });
        assert_eq!(args.env_entries().count(), 0);
    }
}
