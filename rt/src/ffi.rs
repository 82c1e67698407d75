//! C-linkage exports for programs linked against this start routine.

use core::ffi::c_ulong;

#[unsafe(no_mangle)]
pub extern "C" fn getauxval(a_type: c_ulong) -> c_ulong {
    crate::state::getauxval(a_type as usize) as c_ulong
}
