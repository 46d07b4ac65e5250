use crate::jumps::JumpTable;
use crate::lexer::{LexerToken, LexerTokenKind};

use super::{Runtime, RuntimeError};

/// The plain fetch-decode-execute loop: no counters, no classification,
/// just the program running against the runtime's tape and streams.
pub struct Interpreter {}

impl Interpreter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn run(
        &mut self,
        runtime: &mut Runtime,
        tokens: &[LexerToken],
        jumps: &JumpTable,
    ) -> Result<(), RuntimeError> {
        let mut pc = 0;
        while pc < tokens.len() {
            match tokens[pc].kind {
                LexerTokenKind::Increment => runtime
                    .shift_data_pointer(1)
                    .map_err(|source| RuntimeError::TapeOutOfBounds { position: pc, source })?,
                LexerTokenKind::Decrement => runtime
                    .shift_data_pointer(-1)
                    .map_err(|source| RuntimeError::TapeOutOfBounds { position: pc, source })?,
                LexerTokenKind::DerefIncrement => runtime.deref_and_add_value(1),
                LexerTokenKind::DerefDecrement => runtime.deref_and_sub_value(1),
                LexerTokenKind::Write => runtime
                    .write_out()
                    .map_err(|source| RuntimeError::Io { position: pc, source })?,
                LexerTokenKind::Read => runtime
                    .read_in()
                    .map_err(|source| RuntimeError::Io { position: pc, source })?,
                LexerTokenKind::JumpStart => {
                    if runtime.value_is_zero() {
                        pc = jumps.target(pc);
                    }
                }
                LexerTokenKind::JumpEnd => {
                    if !runtime.value_is_zero() {
                        pc = jumps.target(pc);
                    }
                }
            }
            // jumps land on the bracket itself; this single advance steps
            // past it, so a re-entered loop resumes at its first body
            // instruction
            pc += 1;
        }
        Ok(())
    }
}
