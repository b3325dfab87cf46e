use std::io::{self, IsTerminal, Write};

use clap::Args;

use crate::commands::run::build_interpreter;
use crate::config::{OutputFormat, Overrides, Settings};
use crate::repl::{execute_bare_once, repl_loop, select_mode, ModeFlagOverride, ReplMode};

#[derive(Args, Debug, Default)]
#[command(disable_help_flag = true)]
pub struct ReplArgs {
    /// Force non-interactive bare mode
    #[arg(long = "bare", conflicts_with = "editor")]
    pub bare: bool,

    /// Force interactive mode (errors if stdin is not a TTY)
    #[arg(long = "editor", conflicts_with = "bare")]
    pub editor: bool,

    /// Number of cells on the tape (fallback TAPEBF_TAPE_SIZE; default 30000)
    #[arg(long = "tape-size", value_name = "N")]
    pub tape_size: Option<usize>,

    /// Print output values as characters instead of numbers
    #[arg(short = 'a', long = "ascii")]
    pub ascii: bool,

    /// Enable the stock extension commands: * (double), / (halve), _ (clear)
    #[arg(short = 'x', long = "ext")]
    pub ext: bool,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

impl ReplArgs {
    pub fn mode_flag(&self) -> ModeFlagOverride {
        if self.bare {
            ModeFlagOverride::Bare
        } else if self.editor {
            ModeFlagOverride::Editor
        } else {
            ModeFlagOverride::None
        }
    }
}

/// Start a REPL session; returns the process exit code.
pub fn run(program: &str, args: ReplArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    match session(&args) {
        Ok(()) => 0,
        Err(msg) => {
            eprintln!("{program}: {msg}");
            let _ = io::stderr().flush();
            1
        }
    }
}

fn session(args: &ReplArgs) -> Result<(), String> {
    let mode = select_mode(args.mode_flag())?;

    let settings = Settings::resolve(Overrides {
        tape_size: args.tape_size,
        output: args.ascii.then_some(OutputFormat::Ascii),
        extensions: args.ext.then_some(true),
        ..Overrides::default()
    });
    let mut bf = build_interpreter(&settings)?;

    // Ctrl+C ends the session at once, whatever the interpreter is doing.
    ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(0);
    })
    .map_err(|e| format!("failed to set ctrl+c handler: {e}"))?;

    tracing::debug!(?mode, tape_size = settings.tape_size, "repl session starting");

    match mode {
        ReplMode::Editor => {
            if io::stderr().is_terminal() {
                eprintln!("tapebf REPL: Ctrl+D runs the buffer (Ctrl+Z Enter on Windows), :help lists meta commands, Ctrl+C quits");
            }
            repl_loop(&mut bf).map_err(|e| format!("REPL error: {e}"))
        }
        ReplMode::Bare => execute_bare_once(&mut bf).map_err(|e| format!("REPL error: {e}")),
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} repl [OPTIONS]

Options:
  --bare              Read all of stdin, run it once, exit
  --editor            Interactive line editor (stdin must be a TTY)
  --ascii,  -a        Print output values as characters instead of numbers
  --ext,    -x        Enable extension commands: * (double), / (halve), _ (clear)
  --tape-size <N>     Number of tape cells (default 30000)
  --help,   -h        Show this help

Meta commands (a submission starting with ":"):
  :exit    Leave the REPL
  :help    List meta commands
  :reset   Zero the tape and move the pointer to cell 0
  :tape    Print the cells around the pointer

Editor keys:
  Enter inserts a newline; Ctrl+D submits (Ctrl+Z then Enter on Windows).
  Ctrl+C quits immediately.

The tape carries over from one submission to the next. Characters that are
not commands are dropped before execution.

Mode: --bare/--editor, else TAPEBF_REPL_MODE=bare|editor, else editor when
stdin is a TTY. Banners are only printed when stderr is a TTY.
TAPEBF_REPL_ONCE=1 leaves the editor after the first submission.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
