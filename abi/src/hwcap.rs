//! Hardware capability bits reported through `AT_HWCAP`.
//!
//! On x86_64 Linux the value is the EDX word of CPUID leaf 1.

use bitflags::bitflags;

bitflags! {
    /// x86 CPUID.1:EDX feature bits as delivered in `AT_HWCAP`.
    ///
    /// Unknown bits are retained, so a value read from a newer kernel
    /// round-trips through [`HwCap::bits`] unchanged.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use launchpad_abi::HwCap;
    ///
    /// let caps = HwCap::from_bits_retain(launchpad_rt::aux_hwcap());
    /// if caps.contains(HwCap::SSE2) {
    ///     // vectorised path
    /// }
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct HwCap: usize {
        /// x87 FPU on chip (bit 0).
        const FPU   = 1 << 0;
        /// Time stamp counter (bit 4).
        const TSC   = 1 << 4;
        /// Model specific registers (bit 5).
        const MSR   = 1 << 5;
        /// CMPXCHG8B (bit 8).
        const CX8   = 1 << 8;
        /// On-chip APIC (bit 9).
        const APIC  = 1 << 9;
        /// SYSENTER/SYSEXIT (bit 11).
        const SEP   = 1 << 11;
        /// Conditional move (bit 15).
        const CMOV  = 1 << 15;
        /// MMX (bit 23).
        const MMX   = 1 << 23;
        /// FXSAVE/FXRSTOR (bit 24).
        const FXSR  = 1 << 24;
        /// SSE (bit 25).
        const SSE   = 1 << 25;
        /// SSE2 (bit 26).
        const SSE2  = 1 << 26;
        /// Hyper-threading (bit 28).
        const HTT   = 1 << 28;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hwcap_retains_unknown_bits() {
        let raw = (1 << 26) | (1 << 25) | (1 << 31);
        let caps = HwCap::from_bits_retain(raw);
        assert!(caps.contains(HwCap::SSE | HwCap::SSE2));
        assert!(!caps.contains(HwCap::MMX));
        assert_eq!(caps.bits(), raw);
    }
}
