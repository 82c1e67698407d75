//! Locating and reading the auxiliary vector.
//!
//! The vector is never copied. [`AuxVector::locate`] records where it starts
//! on the loader's stack, and lookups walk it in place until the end record.

use core::fmt;
use core::marker::PhantomData;

use launchpad_abi::{AuxEntry, AuxRecord, aux_type_name};

use crate::stack::StackLayout;

/// Read-only view of an end-terminated auxiliary vector.
#[derive(Clone, Copy)]
pub struct AuxVector<'a, E: AuxRecord = AuxEntry> {
    base: *const E,
    _vector: PhantomData<&'a [E]>,
}

// SAFETY: the vector is loader-owned memory that nothing writes after exec;
// sharing a read-only pointer to it between threads is sound.
unsafe impl<E: AuxRecord> Send for AuxVector<'_, E> {}
unsafe impl<E: AuxRecord> Sync for AuxVector<'_, E> {}

impl<'a, E: AuxRecord> AuxVector<'a, E> {
    /// The vector begins at the word after the *original* envp terminator,
    /// not after the materialized copy.
    pub fn locate(layout: &StackLayout<'a>) -> Self {
        Self {
            base: layout.envp_end() as *const E,
            _vector: PhantomData,
        }
    }

    /// # Safety
    ///
    /// `base` must point at an `E::END`-terminated record array that stays
    /// valid and unmodified for `'a`.
    pub const unsafe fn from_ptr(base: *const E) -> Self {
        Self {
            base,
            _vector: PhantomData,
        }
    }

    #[inline]
    pub fn as_ptr(&self) -> *const E {
        self.base
    }

    /// Value of the first record tagged `a_type`, or 0 when the end record is
    /// reached first. An explicit 0 and an absent tag look the same.
    pub fn lookup(&self, a_type: usize) -> usize {
        self.iter()
            .find(|entry| entry.a_type() == a_type)
            .map_or(0, |entry| entry.a_val())
    }

    /// Records in order, stopping before the end record.
    pub fn iter(&self) -> AuxIter<'a, E> {
        AuxIter {
            cursor: self.base,
            _vector: PhantomData,
        }
    }
}

impl<E: AuxRecord> fmt::Debug for AuxVector<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for entry in self.iter() {
            list.entry(&format_args!(
                "{}={:#x}",
                aux_type_name(entry.a_type()),
                entry.a_val()
            ));
        }
        list.finish()
    }
}

pub struct AuxIter<'a, E: AuxRecord> {
    cursor: *const E,
    _vector: PhantomData<&'a [E]>,
}

impl<E: AuxRecord> Iterator for AuxIter<'_, E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        // SAFETY: the cursor never moves past the end record, which the
        // vector's constructor guarantees exists.
        let entry = unsafe { *self.cursor };
        if entry.is_end() {
            return None;
        }
        self.cursor = unsafe { self.cursor.add(1) };
        Some(entry)
    }
}

impl<E: AuxRecord> core::iter::FusedIterator for AuxIter<'_, E> {}
