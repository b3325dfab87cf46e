use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

// Isolate every run from the user's config file and TAPEBF_* environment.
fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("tapebf").unwrap();
    cmd.env("TAPEBF_CONFIG", "/nonexistent/tapebf.toml")
        .env_remove("TAPEBF_TAPE_SIZE")
        .env_remove("TAPEBF_CELL_MODE")
        .env_remove("TAPEBF_OUTPUT")
        .env_remove("TAPEBF_EXTENSIONS")
        .env_remove("RUST_LOG");
    cmd
}

fn read_to_tempfile(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

#[test]
fn test_run_positional_code_prints_numbers() {
    cargo_bin()
        .arg("run").arg("+++.")
        .assert()
        .success()
        .stdout("3\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_run_concatenates_code_parts() {
    cargo_bin()
        .args(["run", "++", "+."])
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn test_run_file_success() {
    let tf = read_to_tempfile("+.+.");
    cargo_bin()
        .arg("run").arg("--file").arg(tf.path())
        .assert()
        .success()
        .stdout("1\n2\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_run_ascii_output() {
    let program = format!("{}.", "+".repeat(65)); // 'A'
    cargo_bin()
        .args(["run", "--ascii", &program])
        .assert()
        .success()
        .stdout("A\n");
}

#[test]
fn test_run_reads_integer_lines_from_stdin() {
    cargo_bin()
        .args(["run", ",.,."])
        .write_stdin("20\n-4\n")
        .assert()
        .success()
        .stdout("20\n-4\n");
}

#[test]
fn test_run_bad_input_warns_and_continues() {
    cargo_bin()
        .args(["run", "+,."])
        .write_stdin("abc\n")
        .assert()
        .success()
        .stdout("1\n")
        .stderr(predicate::str::contains("not a base-10 integer"));
}

#[test]
fn test_run_ext_enables_double() {
    cargo_bin()
        .args(["run", "--ext", ".+.*.+.*."])
        .assert()
        .success()
        .stdout("0\n1\n2\n3\n6\n");
}

#[test]
fn test_run_without_ext_rejects_star() {
    cargo_bin()
        .args(["run", ".+.*."])
        .assert()
        .code(1)
        .stdout("0\n1\n")
        .stderr(predicate::str::contains("unknown command '*'").and(predicate::str::contains("at position 3")));
}

#[test]
fn test_run_small_tape_wraps() {
    cargo_bin()
        .args(["run", "--tape-size", "3", "<+.>>>."])
        .assert()
        .success()
        .stdout("1\n1\n");
}

#[test]
fn test_run_byte_cells() {
    cargo_bin()
        .args(["run", "--cells", "byte", "-."])
        .assert()
        .success()
        .stdout("255\n");
}

#[test]
fn test_run_zero_tape_size_fails() {
    cargo_bin()
        .args(["run", "--tape-size", "0", "+"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("tape must have at least one cell"));
}

#[test]
fn test_run_debug_prints_table() {
    cargo_bin()
        .args(["run", "--debug", ">"])
        .assert()
        .success()
        .stderr(predicate::str::contains("STEP | IP").and(predicate::str::contains("Moved pointer head to index 1")));
}

#[test]
fn test_run_debug_keeps_stdout_to_program_output() {
    cargo_bin()
        .args(["run", "--debug", "+."])
        .assert()
        .success()
        .stdout("1\n")
        .stderr(predicate::str::contains("Output value 1"));
}

#[test]
fn test_run_huge_tape_size_fails_cleanly() {
    cargo_bin()
        .args(["run", "--tape-size", "18446744073709551615", "+."])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cannot allocate a tape of 18446744073709551615 cells"));
}

#[test]
fn test_run_huge_tape_size_from_env_fails_cleanly() {
    cargo_bin()
        .env("TAPEBF_TAPE_SIZE", "18446744073709551615")
        .args(["run", "+."])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot allocate a tape"));
}

#[test]
fn test_run_code_may_start_with_hyphen() {
    cargo_bin()
        .args(["run", "-+."])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn test_run_options_after_code_are_program_text() {
    cargo_bin()
        .args(["run", "+.", "--ascii"])
        .assert()
        .code(1)
        .stdout("1\n")
        .stderr(predicate::str::contains("unknown command 'a' at position 4"));
}

#[test]
fn test_run_without_code_is_usage_error() {
    cargo_bin()
        .arg("run")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_run_code_and_file_conflict() {
    let tf = read_to_tempfile("+");
    cargo_bin()
        .arg("run").arg("--file").arg(tf.path()).arg("+")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot use positional code together with --file"));
}

#[test]
fn test_run_help_exits_zero() {
    cargo_bin()
        .args(["run", "--help"])
        .assert()
        .success()
        .stderr(predicate::str::contains("--tape-size").and(predicate::str::contains("Options must come before the code")));
}
