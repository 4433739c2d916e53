use wordvm_rs::{codec, isa::Op, Machine};

mod common;
use common::ScriptedConsole;

// Runs: set r1 to `value`, branch to `done` if the condition holds,
// otherwise fall through to `put r1`. Returns whether the branch was taken.
fn branch_taken(op: Op, value: i64) -> bool {
    let mut mem = vec![
        codec::encode(Op::Set as i64, 1, value),
        codec::encode(op as i64, 1, 4), // -> stop at 4
        codec::encode(Op::Put as i64, 1, 0),
        codec::encode(Op::Stop as i64, 0, 0),
        codec::encode(Op::Stop as i64, 0, 0),
    ];
    let mut con = ScriptedConsole::default();
    let mut machine = Machine::new();
    machine.run(&mut mem, &mut con).unwrap();
    con.printed.is_empty()
}

#[test]
fn jp_strictly_positive() {
    assert!(branch_taken(Op::Jp, 1));
    assert!(!branch_taken(Op::Jp, 0));
    assert!(!branch_taken(Op::Jp, -1));
}

#[test]
fn jpz_non_negative() {
    assert!(branch_taken(Op::Jpz, 1));
    assert!(branch_taken(Op::Jpz, 0));
    assert!(!branch_taken(Op::Jpz, -1));
}

#[test]
fn jz_zero_only() {
    assert!(branch_taken(Op::Jz, 0));
    assert!(!branch_taken(Op::Jz, 1));
    assert!(!branch_taken(Op::Jz, -1));
}

#[test]
fn jn_strictly_negative() {
    assert!(branch_taken(Op::Jn, -1));
    assert!(!branch_taken(Op::Jn, 0));
    assert!(!branch_taken(Op::Jn, 1));
}

#[test]
fn jnz_non_positive() {
    assert!(branch_taken(Op::Jnz, -1));
    assert!(branch_taken(Op::Jnz, 0));
    assert!(!branch_taken(Op::Jnz, 1));
}

#[test]
fn unconditional_jump_ignores_registers() {
    let mut mem = vec![
        codec::encode(Op::J as i64, 0, 2),
        codec::encode(Op::Put as i64, 1, 0), // skipped
        codec::encode(Op::Stop as i64, 0, 0),
    ];
    let mut con = ScriptedConsole::default();
    let mut machine = Machine::new();
    machine.run(&mut mem, &mut con).unwrap();
    assert!(con.printed.is_empty());
}

#[test]
fn jump_to_negative_address_halts() {
    let mut mem = vec![codec::encode(Op::J as i64, 0, -1)];
    let mut machine = Machine::new();
    machine.run(&mut mem, &mut ScriptedConsole::default()).unwrap();
    assert!(machine.halted());
}

#[test]
fn countdown_loop_terminates() {
    let mut mem = wordvm_rs::assemble(
        "        set r1, 3\n\
         loop:   put r1\n\
         subi r1, 1\n\
         jp r1, loop\n\
         stop\n",
    )
    .unwrap();
    let mut con = ScriptedConsole::default();
    let mut machine = Machine::new();
    machine.run(&mut mem, &mut con).unwrap();
    assert_eq!(con.printed, vec![3, 2, 1]);
}
