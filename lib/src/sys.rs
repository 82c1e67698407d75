//! Raw Linux syscall primitives used before any libc exists.
//!
//! Only the handful of calls the start path needs are wrapped: `write` for
//! diagnostics and `exit_group` for the final status. Everything here is safe
//! to call before the heap, TLS or any lock has been set up.
//!
//! # ABI Convention
//!
//! x86_64: rax = number, rdi/rsi/rdx = args, rcx/r11 clobbered.
//! aarch64: x8 = number, x0..x2 = args, result in x0.

use core::arch::asm;

pub const STDOUT_FILENO: i32 = 1;
pub const STDERR_FILENO: i32 = 2;

#[cfg(target_arch = "x86_64")]
mod numbers {
    pub const SYS_WRITE: usize = 1;
    pub const SYS_EXIT_GROUP: usize = 231;
}

#[cfg(target_arch = "aarch64")]
mod numbers {
    pub const SYS_WRITE: usize = 64;
    pub const SYS_EXIT_GROUP: usize = 94;
}

pub use numbers::*;

#[cfg(target_arch = "x86_64")]
#[inline(always)]
unsafe fn syscall1(num: usize, arg0: usize) -> isize {
    let ret: isize;
    unsafe {
        asm!(
            "syscall",
            inlateout("rax") num as isize => ret,
            in("rdi") arg0,
            out("rcx") _,
            out("r11") _,
            options(nostack),
        );
    }
    ret
}

#[cfg(target_arch = "x86_64")]
#[inline(always)]
unsafe fn syscall3(num: usize, arg0: usize, arg1: usize, arg2: usize) -> isize {
    let ret: isize;
    unsafe {
        asm!(
            "syscall",
            inlateout("rax") num as isize => ret,
            in("rdi") arg0,
            in("rsi") arg1,
            in("rdx") arg2,
            out("rcx") _,
            out("r11") _,
            options(nostack),
        );
    }
    ret
}

#[cfg(target_arch = "aarch64")]
#[inline(always)]
unsafe fn syscall1(num: usize, arg0: usize) -> isize {
    let ret: isize;
    unsafe {
        asm!(
            "svc 0",
            in("x8") num,
            inlateout("x0") arg0 as isize => ret,
            options(nostack),
        );
    }
    ret
}

#[cfg(target_arch = "aarch64")]
#[inline(always)]
unsafe fn syscall3(num: usize, arg0: usize, arg1: usize, arg2: usize) -> isize {
    let ret: isize;
    unsafe {
        asm!(
            "svc 0",
            in("x8") num,
            inlateout("x0") arg0 as isize => ret,
            in("x1") arg1,
            in("x2") arg2,
            options(nostack),
        );
    }
    ret
}

/// Write `buf` to `fd`, returning bytes written or a negated errno.
#[inline]
pub fn sys_write(fd: i32, buf: &[u8]) -> isize {
    // SAFETY: the kernel only reads `buf.len()` bytes from a live slice.
    unsafe { syscall3(SYS_WRITE, fd as usize, buf.as_ptr() as usize, buf.len()) }
}

/// Write all of `buf`, retrying short writes. Errors are dropped; there is
/// nobody left to report them to this early.
pub fn sys_write_all(fd: i32, mut buf: &[u8]) {
    while !buf.is_empty() {
        let written = sys_write(fd, buf);
        if written <= 0 {
            return;
        }
        buf = &buf[written as usize..];
    }
}

/// Terminate every thread of the process with `status`.
///
/// Returns only if the kernel refused the request; callers must trap.
#[inline]
pub fn sys_exit_group(status: i32) {
    // SAFETY: exit_group takes no pointers.
    unsafe {
        syscall1(SYS_EXIT_GROUP, status as usize);
    }
}

/// Raise an undefined-instruction fault. Used where libc would call abort().
#[inline(always)]
pub fn trap() -> ! {
    // SAFETY: the instruction faults unconditionally and never falls through.
    unsafe {
        #[cfg(target_arch = "x86_64")]
        asm!("ud2", options(noreturn, nomem, nostack));
        #[cfg(target_arch = "aarch64")]
        asm!("udf #0", options(noreturn, nomem, nostack));
    }
}
