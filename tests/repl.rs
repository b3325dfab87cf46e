use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;

// Utilities
fn make_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tapebf").expect("tapebf binary");
    cmd.timeout(Duration::from_secs(5))
        .env("TAPEBF_CONFIG", "/nonexistent/tapebf.toml")
        .env_remove("TAPEBF_REPL_MODE")
        .env_remove("TAPEBF_OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn repl_empty_input_exits_clean_and_quiet() {
    // In non-TTY (piped) stdin, the REPL auto-selects bare mode and prints no prompt.
    make_cmd()
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn repl_bare_valid_program_outputs_values() {
    make_cmd()
        .write_stdin("+++.")
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn repl_bare_ignores_comment_characters() {
    make_cmd()
        .arg("repl")
        .write_stdin("+ one\n+ two\n. print")
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn repl_bare_ext_keeps_custom_commands() {
    make_cmd()
        .args(["repl", "--ext"])
        .write_stdin("+++*.")
        .assert()
        .success()
        .stdout("6\n");
}

#[test]
fn repl_invalid_program_reports_error_and_exits_cleanly() {
    make_cmd()
        .env("TAPEBF_REPL_ONCE", "1")
        .write_stdin("]")
        .assert()
        .success()
        .stderr(predicate::str::contains("Syntax error"));
}

#[test]
fn repl_bare_input_has_no_lines_left() {
    // stdin carried the program, so `,` sees end of input and leaves the cell alone.
    make_cmd()
        .write_stdin("+,.")
        .assert()
        .success()
        .stdout("1\n")
        .stderr(predicate::str::contains("no input available"));
}

#[test]
fn repl_meta_exit_in_bare_mode_is_quiet() {
    make_cmd()
        .write_stdin(":exit\n")
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());
}

#[test]
fn repl_forced_editor_on_non_tty_errors() {
    make_cmd()
        .args(["repl", "--editor"])
        .write_stdin("+++.")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("stdin is not a TTY"));
}

#[test]
fn repl_flag_overrides_env_mode() {
    make_cmd()
        .env("TAPEBF_REPL_MODE", "editor")
        .args(["repl", "--bare"])
        .write_stdin("+++.")
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn repl_invalid_env_mode_errors() {
    make_cmd()
        .env("TAPEBF_REPL_MODE", "fancy")
        .arg("repl")
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid TAPEBF_REPL_MODE value"));
}
