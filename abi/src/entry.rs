//! Calling conventions a user entry point may be built with.
//!
//! The tag is fixed when the program is linked and handed to the start
//! routine next to the initial stack pointer.

use core::fmt;

/// Native signature the user `main` was compiled against.
///
/// New conventions are added as variants with their own tag; existing tags
/// never change meaning.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MainAbi {
    /// `int main(int argc, char **argv, char **envp)`.
    #[default]
    Standard = 0,
    /// `long main(long argc, char **argv)`, used by word-oriented front ends.
    Word = 1,
}

impl MainAbi {
    /// Decode a raw tag.
    ///
    /// Tags without a dedicated variant select [`MainAbi::Standard`] so that
    /// binaries produced by newer front ends still start.
    #[inline]
    pub const fn from_tag(tag: u32) -> Self {
        match tag {
            1 => Self::Word,
            _ => Self::Standard,
        }
    }

    /// Whether `tag` names a variant directly rather than through fallback.
    #[inline]
    pub const fn is_known_tag(tag: u32) -> bool {
        matches!(tag, 0 | 1)
    }

    #[inline]
    pub const fn tag(self) -> u32 {
        self as u32
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Word => "word",
        }
    }
}

impl fmt::Display for MainAbi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
