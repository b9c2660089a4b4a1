//! Replayable game records.
//!
//! A record is the init line plus the plies in wire form, with the digest
//! after the first half of the plies and after the last one. Each ply is
//! replayed the way the robot plays it: execute, then finalize if the
//! result is done-eligible. A record made under an older rules revision
//! keeps that revision in its init line and replays under it.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{EngineError, EngineResult, GameInit};
use crate::rules::GameBoard;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub init: GameInit,
    pub moves: Vec<String>,
    /// Digest after `moves.len() / 2` plies.
    pub midpoint_digest: u64,
    pub final_digest: u64,
}

/// Apply one wire-form ply.
fn apply<B: GameBoard>(board: &mut B, text: &str) -> EngineResult<()> {
    let mut m = board.parse_move(text)?;
    board.apply_ply(&mut m)
}

/// Replay `moves` from `init`, returning the board and the midpoint digest.
fn run<B, F>(init: &GameInit, moves: &[String], make: F) -> EngineResult<(B, u64)>
where
    B: GameBoard,
    F: FnOnce(&GameInit) -> EngineResult<B>,
{
    let mut board = make(init)?;
    let half = moves.len() / 2;
    let mut midpoint = board.digest();
    for (i, text) in moves.iter().enumerate() {
        apply(&mut board, text)?;
        if i + 1 == half {
            midpoint = board.digest();
        }
    }
    Ok((board, midpoint))
}

impl GameRecord {
    /// Build a record by playing `moves` from `init`.
    ///
    /// The stored init line has its revision pinned, so replay stays under
    /// the same rules after the game's current revision moves on.
    pub fn build<B, F>(init: &GameInit, moves: Vec<String>, make: F) -> EngineResult<Self>
    where
        B: GameBoard,
        F: FnOnce(&GameInit) -> EngineResult<B>,
    {
        let (board, midpoint_digest) = run(init, &moves, make)?;
        Ok(Self {
            init: board.game_init().clone(),
            final_digest: board.digest(),
            midpoint_digest,
            moves,
        })
    }

    /// Rebuild the final board and check both digests.
    pub fn replay<B, F>(&self, make: F) -> EngineResult<B>
    where
        B: GameBoard,
        F: FnOnce(&GameInit) -> EngineResult<B>,
    {
        let (board, midpoint) = run(&self.init, &self.moves, make)?;
        if midpoint != self.midpoint_digest {
            return Err(EngineError::DigestMismatch {
                expected: self.midpoint_digest,
                actual: midpoint,
            });
        }
        let actual = board.digest();
        if actual != self.final_digest {
            return Err(EngineError::DigestMismatch {
                expected: self.final_digest,
                actual,
            });
        }
        debug!("record: replayed {} plies of {}", self.moves.len(), self.init);
        Ok(board)
    }

    pub fn to_bytes(&self) -> EngineResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> EngineResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Write the record with bincode.
    pub fn save(&self, path: &Path) -> EngineResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    /// Read a record written by [`GameRecord::save`].
    pub fn load(path: &Path) -> EngineResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(bincode::deserialize_from(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::PileBoard;

    fn make(init: &GameInit) -> EngineResult<PileBoard> {
        Ok(PileBoard::new(init.seed as u8, None))
    }

    fn takes(counts: &[u8]) -> Vec<String> {
        counts.iter().map(|n| format!("take {n}")).collect()
    }

    #[test]
    fn test_build_and_replay() {
        let init = GameInit::latest("pile", 2, 10);
        let record = GameRecord::build(&init, takes(&[2, 3, 1, 2]), make).unwrap();
        let board = record.replay(make).unwrap();
        assert_eq!(board.pile, 2);
        assert_eq!(record.final_digest, board.digest());
        assert_ne!(record.midpoint_digest, record.final_digest);
    }

    #[test]
    fn test_tampered_record_is_rejected() {
        let init = GameInit::latest("pile", 2, 10);
        let mut record = GameRecord::build(&init, takes(&[2, 3, 1, 2]), make).unwrap();
        record.moves[3] = "take 1".to_string();
        assert!(matches!(
            record.replay(make),
            Err(EngineError::DigestMismatch { .. })
        ));
    }

    #[test]
    fn test_bytes_round_trip() {
        let init = GameInit::latest("pile", 2, 10);
        let record = GameRecord::build(&init, takes(&[1, 1]), make).unwrap();
        let back = GameRecord::from_bytes(&record.to_bytes().unwrap()).unwrap();
        assert_eq!(back, record);
        assert!(GameRecord::from_bytes(&[1, 2]).is_err());
    }
}
