// End-to-end behavior of the interpreter through its public API.
use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

use tapebf::{
    Diagnostic, DiagnosticKind, ExecutionError, FnSink, Interpreter, InterpreterConfig, Machine, Partition,
    RegistryError, SharedBuffer,
};

fn interpreter_with_input(input: &'static str) -> (Interpreter, SharedBuffer) {
    let mut bf = Interpreter::new();
    let out = SharedBuffer::new();
    bf.set_output_sink(out.clone());
    bf.set_input_source(Cursor::new(input));
    (bf, out)
}

fn double(m: &mut Machine) {
    let v = m.get();
    m.set(v * 2);
}

#[test]
fn kth_output_after_increments_counts_up() {
    let (mut bf, out) = interpreter_with_input("");
    let program = ".+".repeat(10);
    bf.execute(&program).unwrap();
    assert_eq!(out.values(), (0..10).collect::<Vec<i64>>());
}

#[test]
fn skipped_outer_loop_produces_single_output() {
    let (mut bf, out) = interpreter_with_input("20");
    bf.execute(".[...+[..-]..]").unwrap();
    assert_eq!(out.values(), vec![0]);
}

#[test]
fn custom_double_command() {
    let (mut bf, out) = interpreter_with_input("20");
    bf.add_command('*', double).unwrap();
    bf.execute(".+.*.+.*.").unwrap();
    assert_eq!(out.values(), vec![0, 1, 2, 3, 6]);
}

#[test]
fn custom_closure_can_capture_state() {
    let calls = Rc::new(RefCell::new(0));
    let counter = calls.clone();
    let (mut bf, _) = interpreter_with_input("");
    bf.add_command('!', move |_m: &mut Machine| *counter.borrow_mut() += 1).unwrap();
    bf.execute("!+!+!").unwrap();
    assert_eq!(*calls.borrow(), 3);
}

#[test]
fn adding_a_builtin_name_fails() {
    let (mut bf, _) = interpreter_with_input("");
    let err = bf.add_command('.', double).unwrap_err();
    assert_eq!(err, RegistryError::DuplicateCommand { name: '.', partition: Partition::Builtin });
    assert_eq!(err.to_string(), "command '.' already exists in default commands");
    assert_eq!(bf.registry().custom_names().count(), 0);
}

#[test]
fn adding_a_custom_name_twice_fails() {
    let (mut bf, _) = interpreter_with_input("");
    bf.add_command('*', double).unwrap();
    let err = bf.add_command('*', double).unwrap_err();
    assert_eq!(err.to_string(), "command '*' already exists in custom commands");
}

#[test]
fn removing_a_missing_command_fails() {
    let (mut bf, _) = interpreter_with_input("");
    let err = bf.remove_command('*').unwrap_err();
    assert_eq!(err, RegistryError::UnknownCommand { name: '*' });
    assert_eq!(err.to_string(), "command '*' does not exist in custom commands");
}

#[test]
fn removed_command_becomes_unknown() {
    let (mut bf, _) = interpreter_with_input("");
    bf.add_command('*', double).unwrap();
    bf.remove_command('*').unwrap();
    assert_eq!(
        bf.execute(".+*."),
        Err(ExecutionError::UnknownCommand { ch: '*', position: 2 })
    );
}

#[test]
fn custom_commands_are_per_instance() {
    let (mut a, _) = interpreter_with_input("");
    let (mut b, _) = interpreter_with_input("");
    a.add_command('*', double).unwrap();
    assert!(a.execute("+*").is_ok());
    assert!(matches!(b.execute("+*"), Err(ExecutionError::UnknownCommand { ch: '*', .. })));
}

#[test]
fn unmatched_markers() {
    let (mut bf, _) = interpreter_with_input("");
    assert_eq!(bf.execute("+["), Err(ExecutionError::UnmatchedOpenMarker { position: 1 }));

    let (mut bf, out) = interpreter_with_input("");
    assert_eq!(bf.execute("+[.-]]"), Err(ExecutionError::UnmatchedCloseMarker { position: 5 }));
    // Output produced before the fault is not rolled back.
    assert_eq!(out.values(), vec![1]);
}

#[test]
fn loop_body_zeroing_cell_runs_once() {
    let (mut bf, out) = interpreter_with_input("");
    bf.execute("+++++[.[-]]").unwrap();
    assert_eq!(out.values(), vec![5]);
}

#[test]
fn input_reads_integers_line_by_line() {
    let (mut bf, out) = interpreter_with_input("20\n-4\n");
    bf.execute(",.>,.").unwrap();
    assert_eq!(out.values(), vec![20, -4]);
}

#[test]
fn bad_input_is_reported_and_execution_continues() {
    let seen: Rc<RefCell<Vec<Diagnostic>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let (mut bf, out) = interpreter_with_input("abc\n");
    bf.set_diagnostic_hook(move |d| sink.borrow_mut().push(d.clone()));

    bf.execute("+++,.,.").unwrap();

    assert_eq!(out.values(), vec![3, 3]);
    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].position, Some(3));
    assert_eq!(seen[0].kind, DiagnosticKind::InvalidNumber { line: "abc".to_string() });
    assert_eq!(seen[1].position, Some(5));
    assert_eq!(seen[1].kind, DiagnosticKind::InputExhausted);
}

#[test]
fn closure_sink_receives_one_value_per_output() {
    let batches = Rc::new(RefCell::new(Vec::new()));
    let record = batches.clone();
    let mut bf = Interpreter::new();
    bf.set_output_sink(FnSink(move |values: &[i64]| -> std::io::Result<()> {
        record.borrow_mut().push(values.to_vec());
        Ok(())
    }));
    bf.execute("+.+.").unwrap();
    assert_eq!(*batches.borrow(), vec![vec![1], vec![2]]);
}

#[test]
fn failing_sink_does_not_abort() {
    let mut bf = Interpreter::new();
    bf.set_output_sink(FnSink(|_: &[i64]| -> std::io::Result<()> {
        Err(std::io::Error::other("closed"))
    }));
    assert!(bf.execute("+.+.").is_ok());
    assert_eq!(bf.tape().get(), 2);
}

#[test]
fn pointer_wraps_on_small_tape() {
    let mut bf = Interpreter::with_config(InterpreterConfig::default().tape_size(4)).unwrap();
    let out = SharedBuffer::new();
    bf.set_output_sink(out.clone());
    // Fill cells 3, 2, 1, 0 walking left from cell 0, then read them back walking right.
    bf.execute("<+<++<+++<++++.>.>.>.").unwrap();
    assert_eq!(out.values(), vec![4, 3, 2, 1]);
}
