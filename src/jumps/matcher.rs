use crate::lexer::{LexerToken, LexerTokenKind};

use super::{InnermostLoop, JumpTable, MatchError};

/// Everything the single matching scan produces: the jump table and the
/// innermost loops, in position order.
#[derive(Debug, Clone)]
pub struct MatchedProgram {
    pub jumps: JumpTable,
    pub innermost: Vec<InnermostLoop>,
}

/// One forward scan over the token sequence. `[` positions go on a
/// push-down stack; each `]` pops its match and links both directions.
///
/// Innermost detection rides along on a single pending slot: every `[`
/// overwrites it, and a `]` that pops the pending position emits an
/// innermost pair and clears the slot. A `]` that finds the slot empty is
/// closing a loop that had something nested inside it. Since innermost
/// loops are exactly the pairs whose `[` is still the most recent open at
/// their `]`, this finds all of them, siblings included.
pub fn match_brackets(tokens: &[LexerToken]) -> Result<MatchedProgram, MatchError> {
    let mut jumps = JumpTable::identity(tokens.len());
    let mut innermost = vec![];
    let mut stack: Vec<usize> = vec![];
    let mut pending: Option<usize> = None;

    for (position, token) in tokens.iter().enumerate() {
        match token.kind {
            LexerTokenKind::JumpStart => {
                stack.push(position);
                pending = Some(position);
            }
            LexerTokenKind::JumpEnd => {
                let open = stack.pop().ok_or(MatchError::UnmatchedJumpEnd {
                    position,
                    line: token.line,
                    col: token.col,
                })?;
                jumps.link(open, position);
                if pending.take() == Some(open) {
                    innermost.push(InnermostLoop {
                        open,
                        close: position,
                    });
                }
            }
            _ => {}
        }
    }

    if let Some(&open) = stack.first() {
        let token = &tokens[open];
        return Err(MatchError::UnmatchedJumpStart {
            position: open,
            line: token.line,
            col: token.col,
        });
    }

    Ok(MatchedProgram { jumps, innermost })
}
