pub mod asm;
pub mod codec;
pub mod disasm;
pub mod image;
pub mod io;
pub mod isa;
pub mod lexer;
pub mod vm;

pub use asm::{assemble, AsmError};
pub use io::{Console, StdConsole};
pub use isa::NUM_REGS;
pub use vm::{Exit, Machine, Trap};
