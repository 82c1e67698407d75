//! Owned copies of the loader's argument and environment vectors.
//!
//! `main` receives pointers into buffers the start routine allocated itself,
//! never into the loader's stack. Writes through `argv`/`envp` therefore
//! cannot corrupt what the loader laid out, and a stray write past the end of
//! either vector lands in heap memory instead of on top of the auxv.

use alloc::vec::Vec;

use crate::error::{StartError, VectorKind};
use crate::stack::{CStrPtr, StackLayout};

/// Heap buffer of `N + 1` pointer slots, the last one null.
#[derive(Debug, PartialEq, Eq)]
pub struct OwnedVector {
    slots: Vec<CStrPtr>,
}

impl OwnedVector {
    /// Copy `src`, which must already end with its null terminator.
    ///
    /// Exactly `src.len()` slots are reserved; allocation failure is reported
    /// as [`StartError::OutOfMemory`].
    pub fn materialize(kind: VectorKind, src: &[CStrPtr]) -> Result<Self, StartError> {
        debug_assert!(src.last().is_some_and(|p| p.is_null()));

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(src.len())
            .map_err(|_| StartError::OutOfMemory {
                vector: kind,
                slots: src.len(),
            })?;
        slots.extend_from_slice(src);
        Ok(Self { slots })
    }

    /// Logical entry count, excluding the terminator.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All slots including the terminator.
    #[inline]
    pub fn as_slice(&self) -> &[CStrPtr] {
        &self.slots
    }

    /// Entries without the terminator.
    #[inline]
    pub fn entries(&self) -> &[CStrPtr] {
        &self.slots[..self.len()]
    }

    /// Mutable access to the entries. The terminator is not exposed.
    #[inline]
    pub fn entries_mut(&mut self) -> &mut [CStrPtr] {
        let len = self.len();
        &mut self.slots[..len]
    }

    /// Give the buffer process lifetime. It is never freed.
    pub fn leak(self) -> &'static [CStrPtr] {
        self.slots.leak()
    }
}

pub fn materialize_argv(layout: &StackLayout<'_>) -> Result<OwnedVector, StartError> {
    OwnedVector::materialize(VectorKind::Argv, layout.argv())
}

pub fn materialize_envp(layout: &StackLayout<'_>) -> Result<OwnedVector, StartError> {
    OwnedVector::materialize(VectorKind::Envp, layout.envp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::testing::FakeStack;
    use std::ffi::CStr;

    #[test]
    fn test_argv_copy_has_argc_plus_one_slots() {
        for args in [&["prog"][..], &["prog", "a", "b", "c"][..]] {
            let stack = FakeStack::new(args, &["K=V"], &[]);
            let layout = unsafe { StackLayout::from_raw(stack.sp()) };
            let argv = materialize_argv(&layout).unwrap();

            assert_eq!(argv.as_slice().len(), args.len() + 1);
            assert_eq!(argv.len(), args.len());
            assert_eq!(argv.entries(), &layout.argv()[..args.len()]);
            assert!(argv.as_slice()[args.len()].is_null());
        }
    }

    #[test]
    fn test_envp_copy_with_no_entries() {
        let stack = FakeStack::new(&["prog"], &[], &[]);
        let layout = unsafe { StackLayout::from_raw(stack.sp()) };
        let envp = materialize_envp(&layout).unwrap();

        assert!(envp.is_empty());
        assert_eq!(envp.as_slice().len(), 1);
        assert!(envp.as_slice()[0].is_null());
    }

    #[test]
    fn test_envp_copy_matches_source() {
        let stack = FakeStack::new(&["prog"], &["A=1", "B=2", "C=3"], &[]);
        let layout = unsafe { StackLayout::from_raw(stack.sp()) };
        let envp = materialize_envp(&layout).unwrap();

        assert_eq!(envp.as_slice().len(), 4);
        assert_eq!(envp.as_slice(), layout.envp());
        assert_eq!(unsafe { CStr::from_ptr(envp.entries()[2]) }, c"C=3");
    }

    #[test]
    fn test_copy_survives_source_mutation() {
        let mut stack = FakeStack::new(&["prog", "arg"], &["A=1"], &[]);
        let (argv, envp) = {
            let layout = unsafe { StackLayout::from_raw(stack.sp()) };
            (
                materialize_argv(&layout).unwrap(),
                materialize_envp(&layout).unwrap(),
            )
        };
        let original_arg = argv.entries()[1];
        let original_env = envp.entries()[0];

        let replacement = c"clobbered";
        let arg_slot = stack.argv_slot(1);
        let env_slot = stack.envp_slot(0);
        stack.words[arg_slot] = replacement.as_ptr() as usize;
        stack.words[env_slot] = 0;

        assert_eq!(argv.entries()[1], original_arg);
        assert_eq!(envp.entries()[0], original_env);
        assert_eq!(unsafe { CStr::from_ptr(argv.entries()[1]) }, c"arg");
    }

    #[test]
    fn test_source_survives_copy_mutation() {
        let stack = FakeStack::new(&["prog", "arg"], &["A=1"], &[]);
        let layout = unsafe { StackLayout::from_raw(stack.sp()) };
        let mut argv = materialize_argv(&layout).unwrap();
        let mut envp = materialize_envp(&layout).unwrap();

        argv.entries_mut()[0] = core::ptr::null();
        envp.entries_mut()[0] = core::ptr::null();

        let slot = stack.argv_slot(0);
        assert_eq!(stack.words[slot], stack.strings[0].as_ptr() as usize);
        assert!(!layout.envp()[0].is_null());
    }
}
