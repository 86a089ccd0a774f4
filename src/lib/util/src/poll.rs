/// How long to keep polling a hardware-reported condition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PollPolicy {
    /// Spin until the condition holds. A condition that never holds hangs
    /// the caller, and the watchdog is left to recover the board.
    #[default]
    Forever,
    /// Re-check at most `polls` times after the first unsuccessful check.
    Bounded { polls: u32 },
}

/// The condition was still false after the allowed number of checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Exhausted {
    pub polls: u32,
}

impl PollPolicy {
    /// Evaluate `done` until it returns true or the policy runs out.
    ///
    /// Returns the number of unsuccessful checks made before `done` held.
    /// The condition is always checked at least once, even for
    /// `Bounded { polls: 0 }`.
    pub fn wait<F>(self, mut done: F) -> Result<u32, Exhausted>
    where
        F: FnMut() -> bool,
    {
        let mut polls: u32 = 0;
        loop {
            if done() {
                return Ok(polls);
            }
            polls = polls.saturating_add(1);
            if let PollPolicy::Bounded { polls: limit } = self {
                if polls > limit {
                    return Err(Exhausted { polls });
                }
            }
            core::hint::spin_loop();
        }
    }
}
