// Tiered move scores
//
// A score carries a scalar heuristic plus two outcome tiers. The first tier says
// whether the perspective player takes first place; the second whether it at
// least avoids last place in the three player race.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Outcome {
    #[default]
    Undecided,
    Won,
    Lost,
    /// Leaves some player without a path; never selectable
    Illegal,
}

impl Outcome {
    fn rank(self) -> i8 {
        match self {
            Outcome::Won => 2,
            Outcome::Undecided => 1,
            Outcome::Lost => 0,
            Outcome::Illegal => -1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Undecided => "undecided",
            Outcome::Won => "won",
            Outcome::Lost => "lost",
            Outcome::Illegal => "illegal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Score {
    pub value: i32,
    pub first: Outcome,
    pub second: Outcome,
}

impl Score {
    pub fn new(value: i32, first: Outcome, second: Outcome) -> Self {
        Score { value, first, second }
    }

    /// Both tiers set to the same outcome
    pub fn uniform(value: i32, outcome: Outcome) -> Self {
        Self::new(value, outcome, outcome)
    }

    pub fn illegal() -> Self {
        Self::uniform(0, Outcome::Illegal)
    }

    /// Lower bound for a maximizing node
    pub fn floor() -> Self {
        Self::uniform(i32::MIN, Outcome::Lost)
    }

    /// Upper bound for a minimizing node
    pub fn ceiling() -> Self {
        Self::uniform(i32::MAX, Outcome::Won)
    }

    pub fn is_illegal(&self) -> bool {
        self.first == Outcome::Illegal || self.second == Outcome::Illegal
    }

    pub fn is_won(&self) -> bool {
        self.first == Outcome::Won
    }

    /// Won in both tiers
    pub fn is_decisive_win(&self) -> bool {
        self.first == Outcome::Won && self.second == Outcome::Won
    }

    /// Lost in both tiers
    pub fn is_decisive_loss(&self) -> bool {
        self.first == Outcome::Lost && self.second == Outcome::Lost
    }

    /// First place lost and second place already known
    pub fn is_settled_loss(&self) -> bool {
        self.first == Outcome::Lost && self.second != Outcome::Undecided
    }

    /// Total order: first tier, then second tier unless first place is won, then scalar
    pub fn compare(&self, other: &Score) -> Ordering {
        self.first
            .rank()
            .cmp(&other.first.rank())
            .then_with(|| {
                if self.first == Outcome::Won {
                    Ordering::Equal
                } else {
                    self.second.rank().cmp(&other.second.rank())
                }
            })
            .then_with(|| self.value.cmp(&other.value))
    }

    pub fn is_better_than(&self, other: &Score) -> bool {
        self.compare(other) == Ordering::Greater
    }

    pub fn is_worse_than(&self, other: &Score) -> bool {
        self.compare(other) == Ordering::Less
    }

    pub fn max(self, other: Score) -> Score {
        if self.is_better_than(&other) {
            self
        } else {
            other
        }
    }

    pub fn min(self, other: Score) -> Score {
        if self.is_worse_than(&other) {
            self
        } else {
            other
        }
    }
}
