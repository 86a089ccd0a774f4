/// Busy-wait for `loops` iterations.
///
/// This is the bring-up "settle" primitive: it has no relation to wall-clock
/// time and only guarantees that at least `loops` iterations elapse, which is
/// what the clock and DDR sequences are specified against before any timer
/// is running.
#[inline(never)]
pub fn spin(loops: u32) {
    for i in 0..loops {
        core::hint::black_box(i);
        core::hint::spin_loop();
    }
}
