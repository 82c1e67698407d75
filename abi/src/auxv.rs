//! ELF auxiliary vector definitions (loader-process ABI).
//!
//! The auxiliary vector is placed on the initial stack by the loader during
//! exec(). It provides runtime information that the start routine publishes
//! for `getauxval` style queries.
//!
//! Stack layout after exec:
//!   [argc] [argv0..argvN] [NULL] [env0..envN] [NULL] [auxv entries] [AT_NULL,0]

/// A single auxiliary vector record as laid out by the loader.
///
/// The start routine only needs to read the type tag, read the value and
/// recognise the terminating record. Platforms whose loader emits a different
/// record shape implement this trait for their own type and keep the rest of
/// the lookup path unchanged.
pub trait AuxRecord: Copy {
    /// Type tag marking the last record of the vector.
    const END: usize;

    fn a_type(&self) -> usize;
    fn a_val(&self) -> usize;

    #[inline]
    fn is_end(&self) -> bool {
        self.a_type() == Self::END
    }
}

/// Auxiliary vector entry (two machine words).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuxEntry {
    pub a_type: usize,
    pub a_val: usize,
}

impl AuxEntry {
    pub const fn new(a_type: usize, a_val: usize) -> Self {
        Self { a_type, a_val }
    }

    /// The `AT_NULL` record closing every vector.
    pub const fn end() -> Self {
        Self::new(AT_NULL, 0)
    }
}

impl AuxRecord for AuxEntry {
    const END: usize = AT_NULL;

    #[inline]
    fn a_type(&self) -> usize {
        self.a_type
    }

    #[inline]
    fn a_val(&self) -> usize {
        self.a_val
    }
}

const _: () = assert!(core::mem::size_of::<AuxEntry>() == 2 * core::mem::size_of::<usize>());

// =============================================================================
// Auxiliary vector type constants (from ELF spec / Linux ABI)
// =============================================================================

/// End of auxiliary vector.
pub const AT_NULL: usize = 0;

/// Entry should be ignored.
pub const AT_IGNORE: usize = 1;

/// Address of program headers in memory.
pub const AT_PHDR: usize = 3;

/// Size of each program header entry.
pub const AT_PHENT: usize = 4;

/// Number of program headers.
pub const AT_PHNUM: usize = 5;

/// System page size.
pub const AT_PAGESZ: usize = 6;

/// Base address of the interpreter (0 for static binaries).
pub const AT_BASE: usize = 7;

/// Flags (unused, set to 0).
pub const AT_FLAGS: usize = 8;

/// Entry point of the program (not the interpreter).
pub const AT_ENTRY: usize = 9;

/// UID of the process.
pub const AT_UID: usize = 11;

/// Effective UID.
pub const AT_EUID: usize = 12;

/// GID of the process.
pub const AT_GID: usize = 13;

/// Effective GID.
pub const AT_EGID: usize = 14;

/// Address of a string identifying the platform.
pub const AT_PLATFORM: usize = 15;

/// Architecture-dependent hardware capability bits.
pub const AT_HWCAP: usize = 16;

/// Frequency of `times()`.
pub const AT_CLKTCK: usize = 17;

/// Secure mode boolean (0 = normal).
pub const AT_SECURE: usize = 23;

/// Address of 16 random bytes.
pub const AT_RANDOM: usize = 25;

/// Extension of `AT_HWCAP`.
pub const AT_HWCAP2: usize = 26;

/// Address of the filename the program was executed as.
pub const AT_EXECFN: usize = 31;

/// Address of the vDSO ELF header.
pub const AT_SYSINFO_EHDR: usize = 33;

/// Human readable name for a well-known tag, used in trace output.
pub const fn aux_type_name(a_type: usize) -> &'static str {
    match a_type {
        AT_NULL => "AT_NULL",
        AT_IGNORE => "AT_IGNORE",
        AT_PHDR => "AT_PHDR",
        AT_PHENT => "AT_PHENT",
        AT_PHNUM => "AT_PHNUM",
        AT_PAGESZ => "AT_PAGESZ",
        AT_BASE => "AT_BASE",
        AT_FLAGS => "AT_FLAGS",
        AT_ENTRY => "AT_ENTRY",
        AT_UID => "AT_UID",
        AT_EUID => "AT_EUID",
        AT_GID => "AT_GID",
        AT_EGID => "AT_EGID",
        AT_PLATFORM => "AT_PLATFORM",
        AT_HWCAP => "AT_HWCAP",
        AT_CLKTCK => "AT_CLKTCK",
        AT_SECURE => "AT_SECURE",
        AT_RANDOM => "AT_RANDOM",
        AT_HWCAP2 => "AT_HWCAP2",
        AT_EXECFN => "AT_EXECFN",
        AT_SYSINFO_EHDR => "AT_SYSINFO_EHDR",
        _ => "AT_?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_record() {
        assert!(AuxEntry::end().is_end());
        assert!(!AuxEntry::new(AT_PAGESZ, 4096).is_end());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(aux_type_name(AT_PAGESZ), "AT_PAGESZ");
        assert_eq!(aux_type_name(AT_HWCAP2), "AT_HWCAP2");
        assert_eq!(aux_type_name(1234), "AT_?");
    }
}
