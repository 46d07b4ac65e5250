use crate::jumps::InnermostLoop;
use crate::lexer::{LexerToken, LexerTokenKind};

use super::LoopClassification;

/// Decide whether a loop body is simple. A single pass over the body's
/// instruction kinds; nothing is executed.
///
/// Disqualifiers, in the order they can trigger:
/// - any IO instruction;
/// - a second add/sub landing on the base cell (pointer offset zero);
/// - net pointer movement once the body has been scanned.
pub fn is_simple(body: &[LexerToken]) -> bool {
    let mut offset: i64 = 0;
    let mut zeroing_site = false;

    for token in body {
        match token.kind {
            LexerTokenKind::Write | LexerTokenKind::Read => return false,
            LexerTokenKind::Increment => offset += 1,
            LexerTokenKind::Decrement => offset -= 1,
            LexerTokenKind::DerefIncrement | LexerTokenKind::DerefDecrement => {
                if offset == 0 {
                    if zeroing_site {
                        return false;
                    }
                    zeroing_site = true;
                }
            }
            // a nested loop means the caller handed us something that
            // isn't innermost; those are general no matter what
            LexerTokenKind::JumpStart | LexerTokenKind::JumpEnd => return false,
        }
    }

    offset == 0
}

/// Classify every innermost loop of the program.
pub fn classify_loops(
    tokens: &[LexerToken],
    innermost: &[InnermostLoop],
) -> Vec<LoopClassification> {
    innermost
        .iter()
        .map(|l| {
            let body = &tokens[l.open + 1..l.close];
            LoopClassification {
                open: l.open,
                close: l.close,
                simple: is_simple(body),
                body: body.iter().map(|t| t.kind.as_char()).collect(),
            }
        })
        .collect()
}
