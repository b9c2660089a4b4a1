//! Volcano moves and their wire format.
//!
//! ```text
//! move B 2 C 2   slide a cap one cell and erupt the stack it leaves
//! pickb B 2      lift the top piece (a cap during play)
//! dropb C 2      put the held piece down
//! done | start 1 | resign | edit | gameovertime
//! ```

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::board::VolcanoUndo;
use crate::core::{EngineResult, MoveParseError, PlayerId};
use crate::grid::Coord;
use crate::moves::{MoveSpec, MoveTokens, OpcodeDictionary};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolcanoOp {
    Done,
    Move,
    PickB,
    DropB,
    Start,
    Resign,
    Edit,
    GameOverOnTime,
}

impl VolcanoOp {
    pub fn dictionary() -> &'static OpcodeDictionary<VolcanoOp> {
        static DICTIONARY: OnceLock<OpcodeDictionary<VolcanoOp>> = OnceLock::new();
        DICTIONARY.get_or_init(|| {
            OpcodeDictionary::new([
                ("done", VolcanoOp::Done),
                ("move", VolcanoOp::Move),
                ("pickb", VolcanoOp::PickB),
                ("dropb", VolcanoOp::DropB),
                ("start", VolcanoOp::Start),
                ("resign", VolcanoOp::Resign),
                ("edit", VolcanoOp::Edit),
                ("gameovertime", VolcanoOp::GameOverOnTime),
            ])
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolcanoAction {
    Done,
    Move { from: Coord, to: Coord },
    PickB(Coord),
    DropB(Coord),
    Start(PlayerId),
    Resign,
    Edit,
    GameOverOnTime,
}

impl VolcanoAction {
    #[must_use]
    pub fn op(self) -> VolcanoOp {
        match self {
            VolcanoAction::Done => VolcanoOp::Done,
            VolcanoAction::Move { .. } => VolcanoOp::Move,
            VolcanoAction::PickB(_) => VolcanoOp::PickB,
            VolcanoAction::DropB(_) => VolcanoOp::DropB,
            VolcanoAction::Start(_) => VolcanoOp::Start,
            VolcanoAction::Resign => VolcanoOp::Resign,
            VolcanoAction::Edit => VolcanoOp::Edit,
            VolcanoAction::GameOverOnTime => VolcanoOp::GameOverOnTime,
        }
    }
}

/// A move by one seat. `execute` fills in the undo snapshot.
#[derive(Clone, Debug)]
pub struct VolcanoMove {
    pub action: VolcanoAction,
    pub player: PlayerId,
    pub(crate) undo: Option<Box<VolcanoUndo>>,
}

impl VolcanoMove {
    #[must_use]
    pub fn new(action: VolcanoAction, player: PlayerId) -> Self {
        Self {
            action,
            player,
            undo: None,
        }
    }

    /// Cap slide from `from` to the adjacent `to`.
    #[must_use]
    pub fn slide(from: Coord, to: Coord, player: PlayerId) -> Self {
        Self::new(VolcanoAction::Move { from, to }, player)
    }

    #[must_use]
    pub fn done(player: PlayerId) -> Self {
        Self::new(VolcanoAction::Done, player)
    }

    /// Parse a wire string for `player`.
    pub fn parse(text: &str, player: PlayerId) -> EngineResult<Self> {
        let mut tokens = MoveTokens::new(text)?;
        let action = match VolcanoOp::dictionary().lookup(tokens.opcode())? {
            VolcanoOp::Done => VolcanoAction::Done,
            VolcanoOp::Move => VolcanoAction::Move {
                from: tokens.next_coord("from")?,
                to: tokens.next_coord("to")?,
            },
            VolcanoOp::PickB => VolcanoAction::PickB(tokens.next_coord("cell")?),
            VolcanoOp::DropB => VolcanoAction::DropB(tokens.next_coord("cell")?),
            VolcanoOp::Start => {
                let seat = tokens.next_int("player")?;
                let seat = u8::try_from(seat).map_err(|_| MoveParseError::BadOperand {
                    op: tokens.opcode().to_string(),
                    operand: "player",
                    token: seat.to_string(),
                })?;
                VolcanoAction::Start(PlayerId::new(seat))
            }
            VolcanoOp::Resign => VolcanoAction::Resign,
            VolcanoOp::Edit => VolcanoAction::Edit,
            VolcanoOp::GameOverOnTime => VolcanoAction::GameOverOnTime,
        };
        tokens.finish()?;
        Ok(Self::new(action, player))
    }
}

impl MoveSpec for VolcanoMove {
    type Op = VolcanoOp;

    fn op(&self) -> VolcanoOp {
        self.action.op()
    }

    fn player(&self) -> PlayerId {
        self.player
    }

    fn same_move(&self, other: &Self) -> bool {
        self.action == other.action && self.player == other.player
    }

    fn move_string(&self) -> String {
        let name = VolcanoOp::dictionary().name(self.op());
        match self.action {
            VolcanoAction::Move { from, to } => format!("{name} {from} {to}"),
            VolcanoAction::PickB(c) | VolcanoAction::DropB(c) => format!("{name} {c}"),
            VolcanoAction::Start(p) => format!("{name} {}", p.0),
            VolcanoAction::Done
            | VolcanoAction::Resign
            | VolcanoAction::Edit
            | VolcanoAction::GameOverOnTime => name.to_string(),
        }
    }
}
