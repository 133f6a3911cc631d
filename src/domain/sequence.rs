//! Monotonic identifier sequences.

/// Hands out identifiers 1, 2, 3, ... and never repeats one.
///
/// Once `u32::MAX` has been handed out or observed the sequence is exhausted
/// and [`IdSequence::next_id`] returns `None` from then on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    next: Option<u32>,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSequence {
    pub fn new() -> Self {
        Self { next: Some(1) }
    }

    pub fn next_id(&mut self) -> Option<u32> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(id)
    }

    /// Record an identifier assigned elsewhere so it is never handed out again.
    pub fn observe(&mut self, id: u32) {
        if let Some(next) = self.next {
            if id >= next {
                self.next = id.checked_add(1);
            }
        }
    }
}
