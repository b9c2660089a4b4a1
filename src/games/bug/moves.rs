//! Bug moves and their wire format.
//!
//! ```text
//! dropb E 5      place a stone (picking one from the reserve if needed)
//! pickb E 5      lift a stone off the board
//! pick white     take a stone from a reserve
//! drop white     return the picked stone to a reserve
//! done           commit the ply
//! start 1        seat 1 moves next
//! resign | edit | gameovertime
//! ```

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::board::BugUndo;
use super::pieces::BugChip;
use crate::core::{EngineResult, MoveParseError, PlayerId};
use crate::grid::Coord;
use crate::moves::{MoveSpec, MoveTokens, OpcodeDictionary};

/// Bug opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BugOp {
    Done,
    DropB,
    PickB,
    Pick,
    Drop,
    Start,
    Resign,
    Edit,
    GameOverOnTime,
}

impl BugOp {
    /// The opcode dictionary, built on first use.
    pub fn dictionary() -> &'static OpcodeDictionary<BugOp> {
        static DICTIONARY: OnceLock<OpcodeDictionary<BugOp>> = OnceLock::new();
        DICTIONARY.get_or_init(|| {
            OpcodeDictionary::new([
                ("done", BugOp::Done),
                ("dropb", BugOp::DropB),
                ("pickb", BugOp::PickB),
                ("pick", BugOp::Pick),
                ("drop", BugOp::Drop),
                ("start", BugOp::Start),
                ("resign", BugOp::Resign),
                ("edit", BugOp::Edit),
                ("gameovertime", BugOp::GameOverOnTime),
            ])
        })
    }
}

/// Opcode with its operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BugAction {
    Done,
    DropB(Coord),
    PickB(Coord),
    Pick(BugChip),
    Drop(BugChip),
    Start(PlayerId),
    Resign,
    Edit,
    GameOverOnTime,
}

impl BugAction {
    #[must_use]
    pub fn op(self) -> BugOp {
        match self {
            BugAction::Done => BugOp::Done,
            BugAction::DropB(_) => BugOp::DropB,
            BugAction::PickB(_) => BugOp::PickB,
            BugAction::Pick(_) => BugOp::Pick,
            BugAction::Drop(_) => BugOp::Drop,
            BugAction::Start(_) => BugOp::Start,
            BugAction::Resign => BugOp::Resign,
            BugAction::Edit => BugOp::Edit,
            BugAction::GameOverOnTime => BugOp::GameOverOnTime,
        }
    }
}

/// A move by one seat. `execute` fills in the undo snapshot.
#[derive(Clone, Debug)]
pub struct BugMove {
    pub action: BugAction,
    pub player: PlayerId,
    pub(crate) undo: Option<Box<BugUndo>>,
}

impl BugMove {
    #[must_use]
    pub fn new(action: BugAction, player: PlayerId) -> Self {
        Self {
            action,
            player,
            undo: None,
        }
    }

    /// Placement on a cell.
    #[must_use]
    pub fn drop_at(coord: Coord, player: PlayerId) -> Self {
        Self::new(BugAction::DropB(coord), player)
    }

    #[must_use]
    pub fn done(player: PlayerId) -> Self {
        Self::new(BugAction::Done, player)
    }

    /// Destination cell of a placement.
    #[must_use]
    pub fn destination(&self) -> Option<Coord> {
        match self.action {
            BugAction::DropB(c) => Some(c),
            _ => None,
        }
    }

    /// Parse a wire string for `player`.
    pub fn parse(text: &str, player: PlayerId) -> EngineResult<Self> {
        let mut tokens = MoveTokens::new(text)?;
        let op = BugOp::dictionary().lookup(tokens.opcode())?;
        let action = match op {
            BugOp::Done => BugAction::Done,
            BugOp::DropB => BugAction::DropB(tokens.next_coord("cell")?),
            BugOp::PickB => BugAction::PickB(tokens.next_coord("cell")?),
            BugOp::Pick | BugOp::Drop => {
                let word = tokens.next_word("color")?;
                let chip = BugChip::by_name(word).ok_or_else(|| MoveParseError::BadOperand {
                    op: tokens.opcode().to_string(),
                    operand: "color",
                    token: word.to_string(),
                })?;
                if op == BugOp::Pick {
                    BugAction::Pick(chip)
                } else {
                    BugAction::Drop(chip)
                }
            }
            BugOp::Start => {
                let seat = tokens.next_int("player")?;
                let seat = u8::try_from(seat).map_err(|_| MoveParseError::BadOperand {
                    op: tokens.opcode().to_string(),
                    operand: "player",
                    token: seat.to_string(),
                })?;
                BugAction::Start(PlayerId::new(seat))
            }
            BugOp::Resign => BugAction::Resign,
            BugOp::Edit => BugAction::Edit,
            BugOp::GameOverOnTime => BugAction::GameOverOnTime,
        };
        tokens.finish()?;
        Ok(Self::new(action, player))
    }
}

impl MoveSpec for BugMove {
    type Op = BugOp;

    fn op(&self) -> BugOp {
        self.action.op()
    }

    fn player(&self) -> PlayerId {
        self.player
    }

    fn same_move(&self, other: &Self) -> bool {
        self.action == other.action && self.player == other.player
    }

    fn move_string(&self) -> String {
        let name = BugOp::dictionary().name(self.op());
        match self.action {
            BugAction::DropB(c) | BugAction::PickB(c) => format!("{name} {c}"),
            BugAction::Pick(chip) | BugAction::Drop(chip) => format!("{name} {}", chip.name()),
            BugAction::Start(p) => format!("{name} {}", p.0),
            BugAction::Done | BugAction::Resign | BugAction::Edit | BugAction::GameOverOnTime => {
                name.to_string()
            }
        }
    }
}
