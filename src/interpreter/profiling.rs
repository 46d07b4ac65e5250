use crate::jumps::JumpTable;
use crate::lexer::{LexerToken, LexerTokenKind};
use crate::profiler::ExecutionProfile;

use super::{Runtime, RuntimeError};

/// Same dispatch loop as [`super::interpreter::Interpreter`], recording
/// counts as a side effect of the one execution pass: every token bumps its
/// own counter after dispatch, and the classified innermost loops count a
/// body entry on the non-skipping `[` and on every back-jumping `]`.
pub struct ProfilingInterpreter {}

impl ProfilingInterpreter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn run(
        &mut self,
        runtime: &mut Runtime,
        tokens: &[LexerToken],
        jumps: &JumpTable,
        profile: &mut ExecutionProfile,
    ) -> Result<(), RuntimeError> {
        let mut pc = 0;
        while pc < tokens.len() {
            // dispatch may reassign pc; the counter belongs to the token
            // that actually ran
            let executed = pc;
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
                    } else {
                        profile.record_entry(executed);
                    }
                }
                LexerTokenKind::JumpEnd => {
                    if !runtime.value_is_zero() {
                        pc = jumps.target(pc);
                        profile.record_entry(executed);
                    }
                }
            }
            profile.record_execution(executed);
            pc += 1;
        }
        Ok(())
    }
}
