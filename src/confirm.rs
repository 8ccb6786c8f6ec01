//! Confirmation before destructive steps
//!
//! Nothing is removed from an archive unless a [`Confirm`] implementation
//! says yes. The console front end answers by reading a line from the user;
//! tests and batch runs pass a closure or one of the fixed answers below.

/// Decides whether a destructive step may proceed
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Answers yes to every prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAccept;

impl Confirm for AlwaysAccept {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Answers no to every prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysDecline;

impl Confirm for AlwaysDecline {
    fn confirm(&mut self, _prompt: &str) -> bool {
        false
    }
}

/// Check a typed answer; only `yes` (any case) counts
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}
