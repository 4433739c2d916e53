use crate::codec;
use crate::isa::{self, ArgKind};

/// One listing line for the word at `addr`. Total: every word renders,
/// unknown opcodes as `??` with the raw word value.
pub fn fmt_word(addr: usize, word: i64) -> String {
    let (code, reg_field, arg) = codec::decode(word);
    let Some(desc) = isa::lookup(code) else {
        return format!("{addr:8}:    ?? <{word}>");
    };

    // Register operands print 1-based, exactly as written in source.
    let reg = reg_field;
    match (desc.has_reg, desc.arg) {
        (true, ArgKind::Reg) => format!("{addr:8}:    {:<8}  r{reg}, r{arg}", desc.mnemonic),
        (true, ArgKind::None) => format!("{addr:8}:    {:<8}  r{reg}", desc.mnemonic),
        (true, _) => format!("{addr:8}:    {:<8}  r{reg}, {arg}", desc.mnemonic),
        (false, ArgKind::None) => format!("{addr:8}:    {}", desc.mnemonic),
        (false, _) => format!("{addr:8}:    {:<8}  {arg}", desc.mnemonic),
    }
}

/// Disassemble a whole buffer, index = address.
pub fn disassemble(mem: &[i64]) -> Vec<String> {
    mem.iter().enumerate().map(|(addr, &w)| fmt_word(addr, w)).collect()
}
