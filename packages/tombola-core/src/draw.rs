//! Draw engine: appends one number to an active game.
//!
//! The engine is a pure state transition. It never mutates the game it is
//! given; on success it returns the updated game, which the caller commits
//! as the new authoritative state. Committing atomically per game is the
//! storage layer's job.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::errors::DomainError;
use crate::game::Game;
use crate::rules::in_range;

/// A committed draw: the number and the game that now includes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOutcome {
    pub number: u8,
    pub game: Game,
}

pub struct DrawEngine<R> {
    rng: R,
}

impl DrawEngine<StdRng> {
    /// Engine seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> DrawEngine<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draw uniformly from the numbers still in the pouch.
    pub fn draw_random(&mut self, game: &Game) -> Result<DrawOutcome, DomainError> {
        game.ensure_active()?;

        let remaining = game.drawn_set().remaining();
        let number = *remaining
            .choose(&mut self.rng)
            .ok_or(DomainError::GameExhausted)?;

        Ok(commit(game, number))
    }

    /// Draw the number the operator picked.
    pub fn draw_manual(&self, game: &Game, number: i32) -> Result<DrawOutcome, DomainError> {
        let number = validate_manual(game, number)?;
        Ok(commit(game, number))
    }
}

/// Check a manual draw without applying it.
///
/// Order matters for the reported error: an inactive game wins over a bad
/// number, and range is checked before duplication.
pub fn validate_manual(game: &Game, number: i32) -> Result<u8, DomainError> {
    game.ensure_active()?;
    if !in_range(number) {
        return Err(DomainError::OutOfRange(number));
    }
    let n = number as u8;
    if game.drawn_set().contains(number) {
        return Err(DomainError::DuplicateDraw(n));
    }
    Ok(n)
}

fn commit(game: &Game, number: u8) -> DrawOutcome {
    let mut next = game.clone();
    next.push_draw(number);
    DrawOutcome { number, game: next }
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn active_game() -> Game {
        let mut game = Game::new(1, "test");
        game.start().unwrap();
        game
    }

    fn engine(seed: u64) -> DrawEngine<ChaCha8Rng> {
        DrawEngine::new(ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn random_draw_appends_and_leaves_input_untouched() {
        let game = active_game();
        let outcome = engine(7).draw_random(&game).unwrap();
        assert!(game.drawn_numbers().is_empty());
        assert_eq!(outcome.game.drawn_numbers(), &[outcome.number]);
        assert_eq!(outcome.game.latest(), Some(outcome.number));
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = engine(42);
        let mut b = engine(42);
        let mut ga = active_game();
        let mut gb = active_game();
        for _ in 0..10 {
            ga = a.draw_random(&ga).unwrap().game;
            gb = b.draw_random(&gb).unwrap().game;
        }
        assert_eq!(ga.drawn_numbers(), gb.drawn_numbers());
    }

    #[test]
    fn inactive_game_rejects_draws() {
        let idle = Game::new(1, "idle");
        assert_eq!(engine(1).draw_random(&idle), Err(DomainError::GameNotActive));
        assert_eq!(
            engine(1).draw_manual(&idle, 10),
            Err(DomainError::GameNotActive)
        );

        let mut ended = active_game();
        ended.end().unwrap();
        assert_eq!(
            engine(1).draw_random(&ended),
            Err(DomainError::GameNotActive)
        );
    }

    #[test]
    fn manual_draw_validation() {
        let game = active_game();
        let e = engine(1);
        assert_eq!(e.draw_manual(&game, 0), Err(DomainError::OutOfRange(0)));
        assert_eq!(e.draw_manual(&game, 91), Err(DomainError::OutOfRange(91)));

        let game = e.draw_manual(&game, 33).unwrap().game;
        assert_eq!(e.draw_manual(&game, 33), Err(DomainError::DuplicateDraw(33)));
        assert_eq!(e.draw_manual(&game, 90).unwrap().number, 90);
    }

    #[test]
    fn exhausts_after_ninety() {
        let mut e = engine(3);
        let mut game = active_game();
        for _ in 0..90 {
            game = e.draw_random(&game).unwrap().game;
        }
        assert_eq!(game.remaining(), 0);
        assert_eq!(e.draw_random(&game), Err(DomainError::GameExhausted));
    }
}
