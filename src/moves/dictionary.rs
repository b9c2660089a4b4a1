//! Opcode name lookup.

use rustc_hash::FxHashMap;

use crate::core::MoveParseError;

/// Case-insensitive two-way map between opcode names and opcode values.
///
/// ## Example
///
/// ```
/// use board_engine::moves::OpcodeDictionary;
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// enum Op { Done, DropB }
///
/// let dict = OpcodeDictionary::new([("done", Op::Done), ("dropb", Op::DropB)]);
/// assert_eq!(dict.lookup("DropB").unwrap(), Op::DropB);
/// assert_eq!(dict.name(Op::Done), "done");
/// assert!(dict.lookup("zap").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct OpcodeDictionary<O> {
    by_name: FxHashMap<String, O>,
    names: Vec<(O, &'static str)>,
}

impl<O: Copy + Eq> OpcodeDictionary<O> {
    /// Build a dictionary. The first name listed for an opcode is the one
    /// `name` returns; later names act as aliases.
    pub fn new(entries: impl IntoIterator<Item = (&'static str, O)>) -> Self {
        let mut by_name = FxHashMap::default();
        let mut names: Vec<(O, &'static str)> = Vec::new();
        for (name, op) in entries {
            by_name.insert(name.to_ascii_lowercase(), op);
            if !names.iter().any(|(o, _)| *o == op) {
                names.push((op, name));
            }
        }
        Self { by_name, names }
    }

    /// Resolve a token to an opcode.
    pub fn lookup(&self, token: &str) -> Result<O, MoveParseError> {
        self.by_name
            .get(&token.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| MoveParseError::UnknownOpcode(token.to_string()))
    }

    /// Canonical name of an opcode.
    #[must_use]
    pub fn name(&self, op: O) -> &'static str {
        self.names
            .iter()
            .find(|(o, _)| *o == op)
            .map_or("?", |(_, n)| n)
    }

    /// Every opcode in registration order.
    pub fn opcodes(&self) -> impl Iterator<Item = O> + '_ {
        self.names.iter().map(|(o, _)| *o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Op {
        Pick,
        Drop,
    }

    #[test]
    fn test_aliases() {
        let dict = OpcodeDictionary::new([("pick", Op::Pick), ("drop", Op::Drop), ("put", Op::Drop)]);
        assert_eq!(dict.lookup("PUT").unwrap(), Op::Drop);
        assert_eq!(dict.name(Op::Drop), "drop");
        assert_eq!(dict.opcodes().collect::<Vec<_>>(), vec![Op::Pick, Op::Drop]);
    }

    #[test]
    fn test_unknown_opcode() {
        let dict = OpcodeDictionary::new([("pick", Op::Pick)]);
        assert_eq!(
            dict.lookup("zap"),
            Err(MoveParseError::UnknownOpcode("zap".into()))
        );
    }
}
