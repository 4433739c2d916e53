use pretty_assertions::assert_eq;
use wordvm_rs::{assemble, codec, isa::Op, Machine, Trap};

mod common;
use common::ScriptedConsole;

fn run_asm(src: &str) -> (Machine, Vec<i64>, ScriptedConsole) {
    let mut mem = assemble(src).unwrap();
    let mut con = ScriptedConsole::default();
    let mut machine = Machine::new();
    machine.run(&mut mem, &mut con).unwrap();
    (machine, mem, con)
}

#[test]
fn arithmetic_in_all_three_operand_forms() {
    let (machine, _, _) = run_asm(
        "        set r1, 10\n\
         set r2, 3\n\
         addm r1, five\n\
         subi r1, 4\n\
         mul r1, r2\n\
         stop\n\
         five:   data 5\n",
    );
    // ((10 + 5) - 4) * r2
    assert_eq!(machine.r[0], 33);
}

#[test]
fn load_store_and_copy() {
    let (machine, mem, _) = run_asm(
        "        ld r1, src\n\
         cpy r2, r1\n\
         muli r2, 2\n\
         st r2, dst\n\
         stop\n\
         src:    data 21\n\
         dst:    data 0\n",
    );
    assert_eq!(machine.r[0], 21);
    assert_eq!(machine.r[1], 42);
    assert_eq!(mem[6], 42);
}

#[test]
fn division_truncates_toward_zero() {
    let (machine, _, _) = run_asm(
        "        set r1, -7\n\
         divi r1, 2\n\
         set r2, 7\n\
         set r3, -2\n\
         div r2, r3\n\
         stop\n",
    );
    assert_eq!(machine.r[0], -3);
    assert_eq!(machine.r[1], -3);
}

#[test]
fn division_by_zero_is_a_fatal_trap() {
    let mut mem = assemble("set r1, 1\ndivi r1, 0\n").unwrap();
    let mut machine = Machine::new();
    let err = machine.run(&mut mem, &mut ScriptedConsole::default()).unwrap_err();
    assert!(matches!(err, Trap::DivideByZero { pc: 1 }));
}

#[test]
fn division_by_zero_register_and_memory_forms() {
    for src in ["set r1, 1\nset r2, 0\ndiv r1, r2\n", "set r1, 1\ndivm r1, z\nz: data 0\n"] {
        let mut mem = assemble(src).unwrap();
        let mut machine = Machine::new();
        let err = machine.run(&mut mem, &mut ScriptedConsole::default()).unwrap_err();
        assert!(matches!(err, Trap::DivideByZero { .. }), "no trap for {src:?}");
    }
}

#[test]
fn illegal_opcode_is_a_fatal_trap() {
    let mut mem = vec![codec::encode(45, 0, 0)];
    let mut machine = Machine::new();
    let err = machine.run(&mut mem, &mut ScriptedConsole::default()).unwrap_err();
    assert!(matches!(err, Trap::IllegalInstruction { pc: 0, op: 45 }));
}

#[test]
fn memory_access_out_of_bounds_traps() {
    let mut mem = vec![codec::encode(Op::Ld as i64, 1, 100)];
    let mut machine = Machine::new();
    let err = machine.run(&mut mem, &mut ScriptedConsole::default()).unwrap_err();
    assert!(matches!(err, Trap::OutOfBounds { pc: 0, addr: 100 }));
}

#[test]
fn running_off_the_end_of_memory_traps() {
    let mut mem = vec![codec::encode(Op::Nop as i64, 0, 0)];
    let mut machine = Machine::new();
    let err = machine.run(&mut mem, &mut ScriptedConsole::default()).unwrap_err();
    assert!(matches!(err, Trap::OutOfBounds { pc: 1, .. }));
}

#[test]
fn bad_register_field_in_bytecode_traps() {
    // Assembler can't produce this; corrupted bytecode can.
    let mut mem = vec![codec::encode(Op::Put as i64, 9, 0)];
    let mut machine = Machine::new();
    let err = machine.run(&mut mem, &mut ScriptedConsole::default()).unwrap_err();
    assert!(matches!(err, Trap::BadRegister { pc: 0, field: 9 }));
}

#[test]
fn wrapping_arithmetic_is_deterministic() {
    let max = (1i64 << 53) - 1;
    let src = format!("set r1, {max}\nmuli r1, {max}\nstop\n");
    let (machine, _, _) = run_asm(&src);
    assert_eq!(machine.r[0], max.wrapping_mul(max));
}

#[test]
fn dbgr_dumps_pc_and_all_registers() {
    let (_, _, con) = run_asm("set r1, 5\ndbgr\nstop\n");
    assert!(con.text.contains("dbgr"));
    assert!(con.text.contains("\tpc\t1\n"));
    assert!(con.text.contains("\tr1\t5\n"));
    assert!(con.text.contains("\tr8\t0\n"));
}

#[test]
fn dbgm_dumps_the_addressed_window() {
    let (_, _, con) = run_asm(
        "        set r1, 2\n\
         dbgm r1, tbl\n\
         stop\n\
         tbl:    data 11\n\
         data 22\n",
    );
    assert!(con.text.contains("\t3:\t11\n"));
    assert!(con.text.contains("\t4:\t22\n"));
}
