//! Game records and repetition bookkeeping.

pub mod game_record;
pub mod repetition;

pub use game_record::GameRecord;
pub use repetition::RepetitionTable;
