//! Move validation: comparing a stored board against a proposed one.
//!
//! Clients submit the whole board after their move. The lenient policy only
//! guarantees that occupied squares are left alone. The strict policy also
//! requires that exactly one empty square was filled, with the mover's mark.

use super::types::{Board, Coord, Mark, Square};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// How much of a proposed board is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovePolicy {
    /// Occupied squares must be unchanged; anything may be written to empty ones.
    #[default]
    Lenient,
    /// As lenient, plus exactly one square changes and it receives the mover's mark.
    Strict,
}

/// Reason a proposed board was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MoveRejection {
    /// An occupied square was changed.
    #[display("square {} is already occupied", _0)]
    Overwrite(#[error(not(source))] Coord),
    /// Strict policy: the number of filled squares was not one.
    #[display("expected one new mark, found {}", _0)]
    ChangedCount(#[error(not(source))] usize),
    /// Strict policy: the new mark is not the mover's.
    #[display("square {} holds the wrong mark", _0)]
    WrongMark(#[error(not(source))] Coord),
}

/// Checks that `proposed` is a legal successor of `stored` for a player
/// holding `mover`.
///
/// `mover` is only consulted by [`MovePolicy::Strict`].
#[instrument(skip(stored, proposed), fields(stored = %stored.to_compact(), proposed = %proposed.to_compact()))]
pub fn validate_move(
    stored: &Board,
    proposed: &Board,
    mover: Option<Mark>,
    policy: MovePolicy,
) -> Result<(), MoveRejection> {
    let mut filled = Vec::new();

    for at in Coord::all() {
        let before = stored.get(at);
        let after = proposed.get(at);
        if before == after {
            continue;
        }
        if before != Square::Empty {
            debug!(position = %at, "Occupied square changed");
            return Err(MoveRejection::Overwrite(at));
        }
        filled.push((at, after));
    }

    if policy == MovePolicy::Lenient {
        return Ok(());
    }

    let [(at, square)] = filled.as_slice() else {
        return Err(MoveRejection::ChangedCount(filled.len()));
    };
    if square.mark() != mover {
        return Err(MoveRejection::WrongMark(*at));
    }

    Ok(())
}
