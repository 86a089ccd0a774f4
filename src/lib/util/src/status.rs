use core::ops::{BitOr, BitOrAssign};

/// Pass/fail code returned by the bring-up stages.
///
/// Codes aggregate with `|`, so a single failure anywhere in a sequence
/// survives into the overall result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u32)]
pub enum Status {
    /// Stage completed
    #[default]
    Pass = 0,
    /// Stage rejected its arguments
    Fail = 1,
}

impl Status {
    pub const fn is_pass(self) -> bool {
        matches!(self, Status::Pass)
    }

    pub const fn code(self) -> u32 {
        self as u32
    }
}

impl BitOr for Status {
    type Output = Status;

    fn bitor(self, rhs: Status) -> Status {
        if (self.code() | rhs.code()) == 0 {
            Status::Pass
        } else {
            Status::Fail
        }
    }
}

impl BitOrAssign for Status {
    fn bitor_assign(&mut self, rhs: Status) {
        *self = *self | rhs;
    }
}

impl<T, E> From<Result<T, E>> for Status {
    fn from(r: Result<T, E>) -> Self {
        match r {
            Ok(_) => Status::Pass,
            Err(_) => Status::Fail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_is_sticky() {
        let mut s = Status::Pass;
        s |= Status::Fail;
        s |= Status::Pass;
        assert_eq!(s, Status::Fail);
        assert_eq!(s.code(), 1);
    }

    #[test]
    fn pass_stays_pass() {
        let mut s = Status::default();
        s |= Status::Pass;
        assert!(s.is_pass());
        assert_eq!(s.code(), 0);
    }

    #[test]
    fn from_result() {
        assert_eq!(Status::from(Ok::<(), ()>(())), Status::Pass);
        assert_eq!(Status::from(Err::<(), _>(3u8)), Status::Fail);
    }
}
