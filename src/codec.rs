//! Bit-packing of one instruction into a 64-bit word.
//!
//! Layout: opcode in bits 58..=63, register field in bits 54..=57 (the
//! 1-based register number, 0 meaning "no register"), argument in bits
//! 0..=53 as a 53-bit magnitude plus a sign flag in bit 53. A negative
//! argument is stored bitwise-inverted, so decode restores it with `!`.

pub const OPCODE_SHIFT: u32 = 58;
pub const REG_SHIFT: u32 = 54;
pub const REG_FIELD_MASK: i64 = 0xf;
pub const ARG_SIGN_BIT: i64 = 1 << 53;
pub const ARG_MAGNITUDE_MASK: i64 = ARG_SIGN_BIT - 1;

/// Largest argument the magnitude field can hold.
pub const ARG_MAX: i64 = ARG_MAGNITUDE_MASK;
/// Most negative argument (`!ARG_MIN` is exactly `ARG_MAX`).
pub const ARG_MIN: i64 = -(1 << 53);

/// Pack `(opcode, reg_field, arg)` into one word. Total: callers validate
/// `reg_field` and `arg` ranges beforehand (the assembler does).
pub fn encode(op: i64, reg_field: i64, arg: i64) -> i64 {
    let mut packed = arg;
    let mut sign = 0i64;
    if arg < 0 {
        packed = !arg;
        sign = ARG_SIGN_BIT;
    }
    (op << OPCODE_SHIFT) | (reg_field << REG_SHIFT) | (packed & ARG_MAGNITUDE_MASK) | sign
}

/// Exact inverse of [`encode`]. Unknown opcode numbers decode like any
/// other; rejecting them is the interpreter's and disassembler's call.
pub fn decode(word: i64) -> (i64, i64, i64) {
    let op = ((word as u64) >> OPCODE_SHIFT) as i64;
    let reg_field = ((word as u64) >> REG_SHIFT) as i64 & REG_FIELD_MASK;
    let mut arg = word & ARG_MAGNITUDE_MASK;
    if word & ARG_SIGN_BIT != 0 {
        arg = !arg;
    }
    (op, reg_field, arg)
}

/// Whether `arg` survives an encode/decode round trip, i.e. its magnitude
/// fits the field once the sign flag is peeled off.
pub fn arg_fits(arg: i64) -> bool {
    (ARG_MIN..=ARG_MAX).contains(&arg)
}
