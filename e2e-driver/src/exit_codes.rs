#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,

    /// The step returned an error (start failure, connect failure, status mismatch).
    StepFailed = 1,

    /// Invalid CLI/env input.
    InvalidInput = 2,
}

impl ExitCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
