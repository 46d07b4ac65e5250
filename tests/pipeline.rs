//! End-to-end runs through the public API: lex, match, classify, execute,
//! report. Mirrors how the binary drives the pipeline.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use tapeprof::classify::classifier::classify_loops;
use tapeprof::interpreter::interpreter::Interpreter;
use tapeprof::interpreter::profiling::ProfilingInterpreter;
use tapeprof::interpreter::Runtime;
use tapeprof::jumps::matcher::{match_brackets, MatchedProgram};
use tapeprof::jumps::MatchError;
use tapeprof::lexer::lexer::Lexer;
use tapeprof::lexer::LexerToken;
use tapeprof::lowering::wasm::lower_to_wasm;
use tapeprof::profiler::report::ProfileReport;
use tapeprof::profiler::ExecutionProfile;

#[derive(Clone, Default)]
struct SharedSink(Rc<RefCell<Vec<u8>>>);

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn front_end(source: &str) -> (Vec<LexerToken>, MatchedProgram) {
    let tokens = Lexer::new(source).collect_tokens();
    let matched = match_brackets(&tokens).unwrap();
    (tokens, matched)
}

#[test]
fn profiled_countdown_loop_end_to_end() {
    let (tokens, matched) = front_end("++++[>++<-]");
    let classifications = classify_loops(&tokens, &matched.innermost);
    let mut profile = ExecutionProfile::new(tokens.len(), classifications);
    let mut runtime = Runtime::new(32, Box::new(io::empty()), Box::new(io::sink()));

    ProfilingInterpreter::new()
        .run(&mut runtime, &tokens, &matched.jumps, &mut profile)
        .unwrap();

    assert_eq!(runtime.cell(0), Some(0));
    assert_eq!(runtime.cell(1), Some(8));

    let report = ProfileReport::from_profile(&tokens, &profile);
    assert_eq!(report.general_loops.len(), 0);
    assert_eq!(report.simple_loops.len(), 1);
    let the_loop = &report.simple_loops[0];
    assert_eq!(the_loop.open, 4);
    assert_eq!(the_loop.entries, 4);
    assert_eq!(the_loop.body, ">++<-");
}

#[test]
fn output_is_emitted_in_execution_order() {
    let (tokens, matched) = front_end("+.+.+.");
    let sink = SharedSink::default();
    let mut runtime = Runtime::new(32, Box::new(io::empty()), Box::new(sink.clone()));

    Interpreter::new()
        .run(&mut runtime, &tokens, &matched.jumps)
        .unwrap();

    assert_eq!(*sink.0.borrow(), vec![1, 2, 3]);
}

#[test]
fn malformed_program_fails_before_any_execution() {
    let tokens = Lexer::new("[[").collect_tokens();
    assert_eq!(tokens.len(), 2);
    let err = match_brackets(&tokens).unwrap_err();
    assert!(matches!(err, MatchError::UnmatchedJumpStart { position: 0, .. }));
}

#[test]
fn plain_and_profiling_runs_agree() {
    let source = ",>++++[<+>-]<.";
    let input = b"0";

    let (tokens, matched) = front_end(source);

    let plain_sink = SharedSink::default();
    let mut plain = Runtime::new(
        32,
        Box::new(io::Cursor::new(input.to_vec())),
        Box::new(plain_sink.clone()),
    );
    Interpreter::new()
        .run(&mut plain, &tokens, &matched.jumps)
        .unwrap();

    let classifications = classify_loops(&tokens, &matched.innermost);
    let mut profile = ExecutionProfile::new(tokens.len(), classifications);
    let profiled_sink = SharedSink::default();
    let mut profiled = Runtime::new(
        32,
        Box::new(io::Cursor::new(input.to_vec())),
        Box::new(profiled_sink.clone()),
    );
    ProfilingInterpreter::new()
        .run(&mut profiled, &tokens, &matched.jumps, &mut profile)
        .unwrap();

    assert_eq!(*plain_sink.0.borrow(), *profiled_sink.0.borrow());
    assert_eq!(*plain_sink.0.borrow(), vec![b'0' + 4]);
    assert_eq!(plain.data_pointer(), profiled.data_pointer());
    for index in 0..4 {
        assert_eq!(plain.cell(index), profiled.cell(index));
    }
}

#[test]
fn nested_inner_loop_counts_every_reentry() {
    let (tokens, matched) = front_end("++[>+++[-]<-]");
    let classifications = classify_loops(&tokens, &matched.innermost);
    let mut profile = ExecutionProfile::new(tokens.len(), classifications);
    let mut runtime = Runtime::new(32, Box::new(io::empty()), Box::new(io::sink()));

    ProfilingInterpreter::new()
        .run(&mut runtime, &tokens, &matched.jumps, &mut profile)
        .unwrap();

    // only the inner clear loop is innermost; it zeroes three increments on
    // each of the two outer iterations
    assert_eq!(profile.loops().len(), 1);
    assert_eq!(profile.loops()[0].open, 7);
    assert_eq!(profile.loops()[0].entries, 6);
}

#[test]
fn matched_source_lowers_to_wasm() {
    let (tokens, _) = front_end("++++[>++<-]>.");
    let bytes = lower_to_wasm(&tokens).unwrap();
    assert_eq!(&bytes[0..4], b"\0asm");
}
