//! Flashcard review state machine.
//!
//! Tracks the current card, which face is shown, and which cards the player
//! has marked as mastered. With `show_mastered` off, navigation skips
//! mastered cards.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::QuizError;
use crate::model::Flashcard;

/// Which side of the current card is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Term,
    Definition,
}

/// Result of [`FlashcardReview::toggle_mastered`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasteryChange {
    /// The card was added to the mastered set. Views may celebrate.
    Mastered,
    /// The card was removed from the mastered set.
    Unmastered,
}

/// Review state over a fetched card list.
#[derive(Debug, Clone)]
pub struct FlashcardReview {
    cards: Vec<Flashcard>,
    index: usize,
    flipped: bool,
    mastered: BTreeSet<usize>,
    show_mastered: bool,
    shuffled: bool,
}

impl FlashcardReview {
    /// Start at the first card, front side up, nothing mastered.
    pub fn new(cards: Vec<Flashcard>) -> Result<Self, QuizError> {
        if cards.is_empty() {
            return Err(QuizError::EmptyResult("flashcards"));
        }
        Ok(Self {
            cards,
            index: 0,
            flipped: false,
            mastered: BTreeSet::new(),
            show_mastered: true,
            shuffled: false,
        })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always `false`; an empty deck cannot be reviewed.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &Flashcard {
        &self.cards[self.index]
    }

    pub fn face(&self) -> Face {
        if self.flipped {
            Face::Definition
        } else {
            Face::Term
        }
    }

    /// Text on the side currently showing.
    pub fn visible_text(&self) -> &str {
        match self.face() {
            Face::Term => &self.current().term,
            Face::Definition => &self.current().definition,
        }
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn show_mastered(&self) -> bool {
        self.show_mastered
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    pub fn is_mastered(&self, index: usize) -> bool {
        self.mastered.contains(&index)
    }

    pub fn current_is_mastered(&self) -> bool {
        self.is_mastered(self.index)
    }

    /// Mastered indices in ascending order.
    pub fn mastered(&self) -> impl Iterator<Item = usize> + '_ {
        self.mastered.iter().copied()
    }

    pub fn mastered_count(&self) -> usize {
        self.mastered.len()
    }

    /// `mastered_count / len`, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        self.mastered.len() as f64 / self.cards.len() as f64
    }

    /// Move forward one card, wrapping at the end.
    pub fn next(&mut self) -> usize {
        self.step(|i, n| (i + 1) % n)
    }

    /// Move back one card, wrapping at the start.
    pub fn previous(&mut self) -> usize {
        self.step(|i, n| (i + n - 1) % n)
    }

    fn step(&mut self, advance: impl Fn(usize, usize) -> usize) -> usize {
        let n = self.cards.len();
        let mut candidate = advance(self.index, n);
        if !self.show_mastered {
            let mut skipped = 0;
            while self.mastered.contains(&candidate) && skipped < n {
                candidate = advance(candidate, n);
                skipped += 1;
            }
            if skipped == n {
                return self.index;
            }
        }
        self.move_to(candidate);
        self.index
    }

    /// Toggle between term and definition.
    pub fn flip(&mut self) -> Face {
        self.flipped = !self.flipped;
        self.face()
    }

    /// Add or remove the current card from the mastered set.
    pub fn toggle_mastered(&mut self) -> MasteryChange {
        if self.mastered.remove(&self.index) {
            MasteryChange::Unmastered
        } else {
            self.mastered.insert(self.index);
            MasteryChange::Mastered
        }
    }

    /// Flip the mastered-card filter. When hiding mastered cards while on a
    /// mastered one, jump to the first unmastered card, if any.
    pub fn toggle_show_mastered(&mut self) -> bool {
        self.show_mastered = !self.show_mastered;
        if !self.show_mastered && self.current_is_mastered() {
            if let Some(first) = (0..self.cards.len()).find(|i| !self.mastered.contains(i)) {
                self.move_to(first);
            }
        }
        self.show_mastered
    }

    /// Jump to a uniformly random card. With mastered cards hidden, only
    /// unmastered cards are candidates unless every card is mastered.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) -> usize {
        self.shuffled = true;
        let unmastered: Vec<usize> = (0..self.cards.len())
            .filter(|i| !self.mastered.contains(i))
            .collect();
        let target = if !self.show_mastered && !unmastered.is_empty() {
            unmastered.choose(rng).copied()
        } else {
            Some(rng.gen_range(0..self.cards.len()))
        };
        if let Some(target) = target {
            self.index = target;
        }
        self.flipped = false;
        self.index
    }

    fn move_to(&mut self, index: usize) {
        if index != self.index {
            self.flipped = false;
        }
        self.index = index;
    }
}
