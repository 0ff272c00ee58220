use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Cards in a full deck.
pub const DECK_SIZE: usize = 52;

/// A 52-card deck consumed from the front.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    dealt: usize,
}

impl Deck {
    /// All 52 cards in suit-major order, unshuffled.
    ///
    /// ```
    /// use holdem_engine::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.remaining(), 52);
    /// ```
    pub fn standard() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&s| Rank::ALL.iter().map(move |&r| Card::new(r, s)))
            .collect();
        Self { cards, dealt: 0 }
    }

    /// A fresh deck permuted with the thread-local CSPRNG.
    pub fn shuffled() -> Self {
        let mut deck = Self::standard();
        deck.shuffle_with(&mut rand::rng());
        deck
    }

    /// A fresh deck whose order is fully determined by `seed`.
    pub fn shuffled_seeded(seed: u64) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_with(&mut ChaCha8Rng::seed_from_u64(seed));
        deck
    }

    /// Shuffle the undealt cards using the provided RNG.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards[self.dealt..].shuffle(rng);
    }

    /// Cards not yet dealt.
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.dealt
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Undealt cards in dealing order.
    pub fn peek(&self) -> &[Card] {
        &self.cards[self.dealt..]
    }

    /// Remove and return the next `n` cards.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `n` cards remain. Hand setup checks deck capacity up front, so
    /// reaching this is a bug in the caller.
    pub fn deal(&mut self, n: usize) -> Vec<Card> {
        assert!(
            n <= self.remaining(),
            "deck exhausted: requested {n} cards with {} remaining",
            self.remaining()
        );
        let out = self.cards[self.dealt..self.dealt + n].to_vec();
        self.dealt += n;
        out
    }
}
