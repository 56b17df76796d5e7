//! Folds a parsed mainline against a starting position, one ply at a time.

use crate::error::ReplayError;
use crate::model::SanNode;
use crate::resolve::resolve;
use chess_core::PlayedMove;
use chess_engine::rules::{GameResult, RuleSet};
use chess_engine::Position;

/// One applied ply: the resolved move/drop and the position it produced.
#[derive(Debug, Clone)]
pub struct ReplayStep {
    pub played: PlayedMove,
    pub position: Position,
}

/// The terminal state of a [`Replay`].
#[derive(Debug, Clone)]
pub enum ReplayOutcome {
    /// Every ply in the mainline resolved and applied cleanly.
    ///
    /// `result` is the rule set's verdict on the final position (`None` if
    /// the game is still ongoing at the point the mainline ends, e.g. a
    /// PGN cut off before resignation or an agreed draw).
    Complete { result: Option<GameResult> },
    /// Replay stopped partway through; `steps` still holds everything that
    /// applied before the failure.
    Incomplete { error: ReplayError },
}

/// The result of folding a SAN mainline against a starting position.
#[derive(Debug, Clone)]
pub struct Replay {
    pub steps: Vec<ReplayStep>,
    pub outcome: ReplayOutcome,
}

impl Replay {
    /// The position reached after the last successfully applied ply, or the
    /// starting position if none applied.
    pub fn final_position<'a>(&'a self, start: &'a Position) -> &'a Position {
        self.steps.last().map_or(start, |s| &s.position)
    }
}

/// Folds `mainline` left-to-right against `start`, resolving and applying
/// one ply at a time under `rules`. Stops at the first ply that fails to
/// resolve, preserving every step applied up to that point.
pub fn replay_mainline(rules: &dyn RuleSet, start: &Position, mainline: &[SanNode]) -> Replay {
    let mut position = start.clone();
    let mut steps = Vec::new();

    for (ply, node) in mainline.iter().enumerate() {
        let Some(san) = &node.san else { continue };
        match resolve(rules, &position, san) {
            Ok(played) => {
                position = match played {
                    PlayedMove::Board(m) => rules.make_move(&position, m),
                    PlayedMove::Drop(d) => rules.apply_drop(&position, d),
                };
                steps.push(ReplayStep {
                    played,
                    position: position.clone(),
                });
            }
            Err(source) => {
                tracing::debug!(ply, error = %source, "replay stopped");
                return Replay {
                    steps,
                    outcome: ReplayOutcome::Incomplete {
                        error: ReplayError { ply, source },
                    },
                };
            }
        }
    }

    Replay {
        steps,
        outcome: ReplayOutcome::Complete {
            result: rules.game_result(&position),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use chess_engine::rules::StandardChess;

    #[test]
    fn replays_a_complete_short_game() {
        let game = parser::parse("1. f3 e5 2. g4 Qh4# *").unwrap();
        let start = StandardChess.initial_position();
        let replay = replay_mainline(&StandardChess, &start, &game.mainline);
        assert_eq!(replay.steps.len(), 4);
        assert!(matches!(
            replay.outcome,
            ReplayOutcome::Complete {
                result: Some(GameResult::BlackWins)
            }
        ));
    }

    #[test]
    fn replay_stops_at_first_illegal_move() {
        // 3. Kd4 is two squares from e2 - no legal king move matches it.
        let game = parser::parse("1. e4 e5 2. Ke2 Ke7 3. Kd4 *").unwrap();
        let start = StandardChess.initial_position();
        let replay = replay_mainline(&StandardChess, &start, &game.mainline);
        match replay.outcome {
            ReplayOutcome::Incomplete { error } => {
                assert_eq!(error.ply, 4);
                assert_eq!(replay.steps.len(), 4);
            }
            ReplayOutcome::Complete { .. } => panic!("expected an incomplete replay"),
        }
    }

    #[test]
    fn replays_crazyhouse_drops() {
        use chess_engine::rules::Crazyhouse;
        let start = Crazyhouse.initial_position();
        // 3. Nxe5 pockets white a pawn; 3...Nxe5 recaptures the knight,
        // pocketing black a knight it then drops back in with 4...N@d3.
        let game = parser::parse("1. e4 e5 2. Nf3 Nc6 3. Nxe5 Nxe5 4. Nc3 N@d3 *").unwrap();
        let replay = replay_mainline(&Crazyhouse, &start, &game.mainline);
        assert!(matches!(replay.outcome, ReplayOutcome::Complete { .. }));
        let last = replay.steps.last().unwrap();
        assert!(matches!(last.played, PlayedMove::Drop(_)));
    }
}
