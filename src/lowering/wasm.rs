use wasm_encoder::{
    BlockType, CodeSection, EntityType, ExportKind, ExportSection, Function, FunctionSection,
    ImportSection, Instruction, MemArg, MemorySection, MemoryType, Module, TypeSection, ValType,
};

use crate::lexer::{LexerToken, LexerTokenKind};

use super::LoweringError;

/// The data pointer lives in the function's only local.
const DP: u32 = 0;

/// Function index of the imported `env.log(i32)` output hook; imports come
/// first in the function index space, so the generated `main` is the next
/// index up.
const LOG_FUNC: u32 = 0;
const MAIN_FUNC: u32 = 1;

/// One pass over the token sequence, emitting a wasm module: linear memory
/// as the tape, an `i32` local as the data pointer, `env.log` for output,
/// and each `[`/`]` pair as a `block`/`loop` nest with a break-if-zero at
/// the top. Brackets are expected to be matched already (the wasm nesting
/// could not be closed otherwise); the finished bytes are validated before
/// they are returned.
pub fn lower_to_wasm(tokens: &[LexerToken]) -> Result<Vec<u8>, LoweringError> {
    let mut module = Module::new();

    let mut types = TypeSection::new();
    types.function([ValType::I32], []);
    let log_type = types.len() - 1;
    types.function([], []);
    let main_type = types.len() - 1;
    module.section(&types);

    let mut imports = ImportSection::new();
    imports.import("env", "log", EntityType::Function(log_type));
    module.section(&imports);

    let mut functions = FunctionSection::new();
    functions.function(main_type);
    module.section(&functions);

    let mut memories = MemorySection::new();
    memories.memory(MemoryType {
        minimum: 1,
        maximum: None,
        memory64: false,
        shared: false,
        page_size_log2: None,
    });
    module.section(&memories);

    let mut exports = ExportSection::new();
    exports.export("main", ExportKind::Func, MAIN_FUNC);
    module.section(&exports);

    let mut main = Function::new(vec![(1, ValType::I32)]);
    for (position, token) in tokens.iter().enumerate() {
        match token.kind {
            LexerTokenKind::Increment => shift_right(&mut main),
            LexerTokenKind::Decrement => shift_left(&mut main),
            LexerTokenKind::DerefIncrement => add_cell(&mut main),
            LexerTokenKind::DerefDecrement => sub_cell(&mut main),
            LexerTokenKind::Write => write_cell(&mut main),
            LexerTokenKind::Read => return Err(LoweringError::InputUnsupported { position }),
            LexerTokenKind::JumpStart => loop_start(&mut main),
            LexerTokenKind::JumpEnd => loop_end(&mut main),
        }
    }
    main.instruction(&Instruction::End);

    let mut codes = CodeSection::new();
    codes.function(&main);
    module.section(&codes);

    let bytes = module.finish();
    wasmparser::validate(&bytes).map_err(|e| LoweringError::InvalidModule(e.to_string()))?;
    Ok(bytes)
}

fn cell_mem_arg() -> MemArg {
    MemArg {
        offset: 0,
        align: 0,
        memory_index: 0,
    }
}

fn shift_right(f: &mut Function) {
    f.instruction(&Instruction::LocalGet(DP));
    f.instruction(&Instruction::I32Const(1));
    f.instruction(&Instruction::I32Add);
    f.instruction(&Instruction::LocalSet(DP));
}

fn shift_left(f: &mut Function) {
    f.instruction(&Instruction::LocalGet(DP));
    f.instruction(&Instruction::I32Const(1));
    f.instruction(&Instruction::I32Sub);
    f.instruction(&Instruction::LocalSet(DP));
}

fn add_cell(f: &mut Function) {
    f.instruction(&Instruction::LocalGet(DP));
    f.instruction(&Instruction::LocalGet(DP));
    f.instruction(&Instruction::I32Load8U(cell_mem_arg()));
    f.instruction(&Instruction::I32Const(1));
    f.instruction(&Instruction::I32Add);
    f.instruction(&Instruction::I32Store8(cell_mem_arg()));
}

fn sub_cell(f: &mut Function) {
    f.instruction(&Instruction::LocalGet(DP));
    f.instruction(&Instruction::LocalGet(DP));
    f.instruction(&Instruction::I32Load8U(cell_mem_arg()));
    f.instruction(&Instruction::I32Const(1));
    f.instruction(&Instruction::I32Sub);
    f.instruction(&Instruction::I32Store8(cell_mem_arg()));
}

fn write_cell(f: &mut Function) {
    f.instruction(&Instruction::LocalGet(DP));
    f.instruction(&Instruction::I32Load8U(cell_mem_arg()));
    f.instruction(&Instruction::Call(LOG_FUNC));
}

/// `block` to break out of, `loop` to continue into, and the zero check at
/// the head so an already-zero cell skips the body entirely.
fn loop_start(f: &mut Function) {
    f.instruction(&Instruction::Block(BlockType::Empty));
    f.instruction(&Instruction::Loop(BlockType::Empty));
    f.instruction(&Instruction::LocalGet(DP));
    f.instruction(&Instruction::I32Load8U(cell_mem_arg()));
    f.instruction(&Instruction::I32Eqz);
    f.instruction(&Instruction::BrIf(1));
}

fn loop_end(f: &mut Function) {
    f.instruction(&Instruction::Br(0));
    f.instruction(&Instruction::End);
    f.instruction(&Instruction::End);
}

#[cfg(test)]
mod tests {
    use crate::lexer::lexer::Lexer;

    use super::*;

    fn lower(source: &str) -> Result<Vec<u8>, LoweringError> {
        lower_to_wasm(&Lexer::new(source).collect_tokens())
    }

    #[test]
    fn lowers_a_looping_program_to_a_valid_module() {
        let bytes = lower("++++[>++<-]>.").unwrap();
        assert_eq!(&bytes[0..4], b"\0asm");
    }

    #[test]
    fn lowers_nested_loops() {
        assert!(lower("+++[>+++[>++<-]<-]").is_ok());
    }

    #[test]
    fn lowers_the_empty_program() {
        assert!(lower("").is_ok());
    }

    #[test]
    fn input_has_no_lowering() {
        match lower("+,").unwrap_err() {
            LoweringError::InputUnsupported { position } => assert_eq!(position, 1),
            other => panic!("unexpected error: {other}"),
        }
    }
}
