//! Trap escape challenge
//!
//! A short memory game: the sequence is shown during the reveal window, then
//! hidden, and the player must enter it back symbol by symbol before the clock
//! runs out. One wrong symbol springs the trap.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{TRAP_REVEAL_SECS, TRAP_SEQUENCE_LEN, TRAP_TIME_LIMIT};

/// Challenge symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Glyph {
    Red,
    Green,
    Blue,
    Yellow,
}

impl Glyph {
    pub const ALL: [Glyph; 4] = [Glyph::Red, Glyph::Green, Glyph::Blue, Glyph::Yellow];
}

/// Why a challenge was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrapFailure {
    WrongGlyph,
    Timeout,
}

/// Where a challenge stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrapStatus {
    /// Sequence on display, input rejected
    Revealing,
    /// Waiting for the next symbol
    Awaiting,
    /// Whole sequence entered
    Escaped,
    /// Challenge lost
    Failed(TrapFailure),
}

impl TrapStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, TrapStatus::Escaped | TrapStatus::Failed(_))
    }
}

/// One trap challenge, created on entry and dropped on exit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrapChallenge {
    pub sequence: [Glyph; TRAP_SEQUENCE_LEN],
    /// Index of the next symbol to enter
    pub expected_index: usize,
    /// Whole seconds left on the clock
    pub time_remaining: u32,
    /// Seconds left in the reveal window
    pub reveal_remaining: f32,
    /// Sub-second time accumulated toward the next clock decrement
    second_accum: f32,
    status: TrapStatus,
}

impl TrapChallenge {
    /// Start a challenge with a random sequence
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let sequence = std::array::from_fn(|_| Glyph::ALL[rng.random_range(0..Glyph::ALL.len())]);
        Self::with_sequence(sequence)
    }

    /// Start a challenge with a known sequence
    pub fn with_sequence(sequence: [Glyph; TRAP_SEQUENCE_LEN]) -> Self {
        Self {
            sequence,
            expected_index: 0,
            time_remaining: TRAP_TIME_LIMIT,
            reveal_remaining: TRAP_REVEAL_SECS,
            second_accum: 0.0,
            status: TrapStatus::Revealing,
        }
    }

    pub fn status(&self) -> TrapStatus {
        self.status
    }

    /// True while the sequence is on display
    pub fn revealing(&self) -> bool {
        self.status == TrapStatus::Revealing
    }

    /// Fraction of the sequence entered so far
    pub fn progress(&self) -> f32 {
        self.expected_index as f32 / TRAP_SEQUENCE_LEN as f32
    }

    /// What the player can see: the whole sequence while revealing, otherwise
    /// only the symbols already entered
    pub fn visible_sequence(&self) -> [Option<Glyph>; TRAP_SEQUENCE_LEN] {
        std::array::from_fn(|i| {
            if self.revealing() || i < self.expected_index {
                Some(self.sequence[i])
            } else {
                None
            }
        })
    }

    /// Advance the reveal window and the clock
    pub fn update(&mut self, dt: f32) -> TrapStatus {
        if self.status.is_finished() {
            return self.status;
        }

        if self.status == TrapStatus::Revealing {
            self.reveal_remaining = (self.reveal_remaining - dt).max(0.0);
            if self.reveal_remaining == 0.0 {
                self.status = TrapStatus::Awaiting;
            }
        }

        // The clock runs from entry, reveal window included
        self.second_accum += dt;
        while self.second_accum >= 1.0 && self.time_remaining > 0 {
            self.second_accum -= 1.0;
            self.time_remaining -= 1;
        }
        if self.time_remaining == 0 {
            self.status = TrapStatus::Failed(TrapFailure::Timeout);
        }

        self.status
    }

    /// Enter one symbol; ignored while revealing or once finished
    pub fn submit(&mut self, glyph: Glyph) -> TrapStatus {
        if self.status != TrapStatus::Awaiting {
            return self.status;
        }

        if glyph == self.sequence[self.expected_index] {
            self.expected_index += 1;
            if self.expected_index == TRAP_SEQUENCE_LEN {
                self.status = TrapStatus::Escaped;
            }
        } else {
            self.status = TrapStatus::Failed(TrapFailure::WrongGlyph);
        }
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Glyph::*;

    const SEQ: [Glyph; TRAP_SEQUENCE_LEN] = [Red, Green, Blue, Yellow, Red, Green];

    fn past_reveal() -> TrapChallenge {
        let mut trap = TrapChallenge::with_sequence(SEQ);
        for _ in 0..(TRAP_REVEAL_SECS as usize * 60 + 1) {
            trap.update(1.0 / 60.0);
        }
        assert_eq!(trap.status(), TrapStatus::Awaiting);
        trap
    }

    #[test]
    fn test_input_rejected_while_revealing() {
        let mut trap = TrapChallenge::with_sequence(SEQ);
        assert_eq!(trap.submit(Red), TrapStatus::Revealing);
        assert_eq!(trap.expected_index, 0);
        assert_eq!(trap.visible_sequence(), SEQ.map(Some));
    }

    #[test]
    fn test_correct_sequence_escapes() {
        let mut trap = past_reveal();
        for (i, glyph) in SEQ.iter().enumerate() {
            let status = trap.submit(*glyph);
            if i + 1 < SEQ.len() {
                assert_eq!(status, TrapStatus::Awaiting);
            } else {
                assert_eq!(status, TrapStatus::Escaped);
            }
        }
        assert_eq!(trap.progress(), 1.0);
    }

    #[test]
    fn test_wrong_symbol_fails_immediately() {
        let mut trap = past_reveal();
        assert_eq!(trap.submit(Red), TrapStatus::Awaiting);
        assert_eq!(
            trap.submit(Yellow),
            TrapStatus::Failed(TrapFailure::WrongGlyph)
        );
        // Further input changes nothing
        assert_eq!(trap.submit(Blue), TrapStatus::Failed(TrapFailure::WrongGlyph));
        assert_eq!(trap.expected_index, 1);
    }

    #[test]
    fn test_hidden_after_reveal() {
        let mut trap = past_reveal();
        trap.submit(Red);
        let visible = trap.visible_sequence();
        assert_eq!(visible[0], Some(Red));
        assert!(visible[1..].iter().all(|g| g.is_none()));
    }

    #[test]
    fn test_clock_runs_out() {
        let mut trap = TrapChallenge::with_sequence(SEQ);
        let mut status = trap.status();
        for _ in 0..(TRAP_TIME_LIMIT - 1) {
            status = trap.update(1.0);
        }
        assert_eq!(status, TrapStatus::Awaiting);
        assert_eq!(trap.time_remaining, 1);
        assert_eq!(trap.update(1.0), TrapStatus::Failed(TrapFailure::Timeout));
        assert_eq!(trap.submit(Red), TrapStatus::Failed(TrapFailure::Timeout));
    }

    #[test]
    fn test_random_sequence_uses_alphabet() {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(3);
        let trap = TrapChallenge::new(&mut rng);
        assert!(trap.sequence.iter().all(|g| Glyph::ALL.contains(g)));
        assert_eq!(trap.time_remaining, TRAP_TIME_LIMIT);
    }
}
