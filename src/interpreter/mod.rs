pub mod interpreter;
pub mod profiling;

use std::io::{self, Read, Write};

use thiserror::Error;

/// The data pointer would leave the tape. The engine attaches the position
/// of the instruction that tried to move it.
#[derive(Error, Debug)]
#[error("data pointer moved out of bounds (tape length {tape_len})")]
pub struct TapeFault {
    pub tape_len: usize,
}

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("instruction {position}: {source}")]
    TapeOutOfBounds {
        position: usize,
        #[source]
        source: TapeFault,
    },

    #[error("instruction {position}: stream error")]
    Io {
        position: usize,
        #[source]
        source: io::Error,
    },
}

pub struct Runtime {
    /// Pointer into the tape
    data_pointer: usize,

    /// Our statically allocated tape
    tape: Vec<u8>,

    in_stream: Box<dyn Read>,
    out_stream: Box<dyn Write>,
}

impl Runtime {
    pub fn new(tape_size: usize, in_stream: Box<dyn Read>, out_stream: Box<dyn Write>) -> Self {
        Self {
            data_pointer: 0,
            // a zero-length tape would leave the pointer nowhere to sit
            tape: vec![0; tape_size.max(1)],
            in_stream,
            out_stream,
        }
    }

    pub fn reset(&mut self) {
        self.tape = vec![0; self.tape.len()];
        self.data_pointer = 0;
    }

    /// Move the data pointer, failing if it would leave the tape. Keeping
    /// the check on the move means every cell access below is in bounds.
    pub fn shift_data_pointer(&mut self, by: isize) -> Result<(), TapeFault> {
        match self
            .data_pointer
            .checked_add_signed(by)
            .filter(|p| *p < self.tape.len())
        {
            Some(p) => {
                self.data_pointer = p;
                Ok(())
            }
            None => Err(TapeFault {
                tape_len: self.tape.len(),
            }),
        }
    }

    pub fn deref_and_add_value(&mut self, by: u8) {
        self.tape[self.data_pointer] = self.tape[self.data_pointer].wrapping_add(by);
    }

    pub fn deref_and_sub_value(&mut self, by: u8) {
        self.tape[self.data_pointer] = self.tape[self.data_pointer].wrapping_sub(by);
    }

    /// Write the byte at the data pointer to the output stream, flushing so
    /// emission order tracks execution order exactly.
    pub fn write_out(&mut self) -> Result<(), io::Error> {
        self.out_stream.write_all(&[self.tape[self.data_pointer]])?;
        self.out_stream.flush()
    }

    /// Blocking read of one byte from the input stream into the byte at the
    /// data pointer. End of input stores a 0 sentinel.
    pub fn read_in(&mut self) -> Result<(), io::Error> {
        let mut byte = [0u8; 1];
        let read = self.in_stream.read(&mut byte)?;
        self.tape[self.data_pointer] = if read == 0 { 0 } else { byte[0] };
        Ok(())
    }

    /// is the value at the data pointer zero?
    pub fn value_is_zero(&self) -> bool {
        self.tape[self.data_pointer] == 0
    }

    pub fn data_pointer(&self) -> usize {
        self.data_pointer
    }

    /// Peek at a cell without disturbing execution state.
    pub fn cell(&self, index: usize) -> Option<u8> {
        self.tape.get(index).copied()
    }
}
