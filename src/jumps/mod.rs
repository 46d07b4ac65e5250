use thiserror::Error;

pub mod matcher;

/// Bidirectional map between matched `[`/`]` token positions.
///
/// Stored as one slot per token: matched brackets point at each other and
/// every other slot points at itself, so `target` is total and
/// `target(target(i)) == i` holds for the whole sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpTable {
    targets: Vec<usize>,
}

impl JumpTable {
    pub(crate) fn identity(len: usize) -> JumpTable {
        JumpTable {
            targets: (0..len).collect(),
        }
    }

    pub(crate) fn link(&mut self, open: usize, close: usize) {
        self.targets[open] = close;
        self.targets[close] = open;
    }

    /// Position of the bracket matching the one at `index`.
    pub fn target(&self, index: usize) -> usize {
        self.targets[index]
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// A loop whose body contains no nested loop. Only these are worth
/// classifying; anything with a loop inside is general by definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InnermostLoop {
    pub open: usize,
    pub close: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("unmatched `]` at instruction {position} (line {line}, column {col})")]
    UnmatchedJumpEnd {
        position: usize,
        line: usize,
        col: usize,
    },

    #[error("unmatched `[` at instruction {position} (line {line}, column {col})")]
    UnmatchedJumpStart {
        position: usize,
        line: usize,
        col: usize,
    },
}
