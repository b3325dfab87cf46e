use std::fs;
use std::io::{self, Write};

use clap::Args;

use crate::cli_util::print_execution_error;
use crate::config::{OutputFormat, Overrides, Settings};
use crate::extensions::register_stock;
use crate::interpreter::Interpreter;
use crate::io::{AsciiSink, NumericSink};
use crate::tape::CellMode;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Print a step-by-step table of operations to stderr while executing
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Read program code from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Concatenated program code parts
    #[arg(value_name = "code", trailing_var_arg = true, allow_hyphen_values = true)]
    pub code: Vec<String>,

    /// Number of cells on the tape (fallback TAPEBF_TAPE_SIZE; default 30000)
    #[arg(long = "tape-size", value_name = "N")]
    pub tape_size: Option<usize>,

    /// Cell semantics: unbounded or byte (fallback TAPEBF_CELL_MODE)
    #[arg(long = "cells", value_name = "MODE")]
    pub cells: Option<CellMode>,

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

impl RunArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            tape_size: self.tape_size,
            cell_mode: self.cells,
            output: self.ascii.then_some(OutputFormat::Ascii),
            extensions: self.ext.then_some(true),
        }
    }
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    if args.file.is_none() && args.code.is_empty() {
        usage_and_exit(program, 2);
    }

    if args.file.is_some() && !args.code.is_empty() {
        eprintln!("{program}: cannot use positional code together with --file");
        usage_and_exit(program, 2);
    }

    let settings = Settings::resolve(args.overrides());

    let code_str = if let Some(path) = &args.file {
        match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{program}: failed to read code file as UTF-8: {e}");
                let _ = io::stderr().flush();
                return 1;
            }
        }
    } else {
        args.code.join("")
    };

    let mut bf = match build_interpreter(&settings) {
        Ok(bf) => bf,
        Err(msg) => {
            eprintln!("{program}: {msg}");
            let _ = io::stderr().flush();
            return 1;
        }
    };

    // The trace goes to stderr so program output on stdout stays clean.
    // Execute the unfiltered code so error positions match the source
    let result = if args.debug {
        bf.execute_traced(&code_str, &mut io::stderr())
    } else {
        bf.execute(&code_str)
    };

    if settings.output == OutputFormat::Ascii {
        // For readability, ensure character output ends with a newline
        println!();
    }
    let _ = io::stdout().flush();

    match result {
        Ok(()) => 0,
        Err(err) => {
            print_execution_error(Some(program), &code_str, &err);
            1
        }
    }
}

/// Interpreter wired to stdout/stdin according to `settings`.
pub fn build_interpreter(settings: &Settings) -> Result<Interpreter, String> {
    let mut bf = Interpreter::with_config(settings.interpreter_config()).map_err(|e| e.to_string())?;

    match settings.output {
        OutputFormat::Numbers => bf.set_output_sink(NumericSink::stdout()),
        OutputFormat::Ascii => bf.set_output_sink(AsciiSink::stdout()),
    }

    if settings.extensions {
        register_stock(&mut bf).map_err(|e| e.to_string())?;
    }

    Ok(bf)
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [OPTIONS] "<code>"
  {0} run [OPTIONS] --file <PATH>

Options:
  --file,  -f <PATH>  Read program code from PATH instead of positional "<code>"
  --debug, -d         Print a step-by-step table of operations to stderr
  --ascii, -a         Print output values as characters instead of numbers
  --ext,   -x         Enable extension commands: * (double), / (halve), _ (clear)
  --tape-size <N>     Number of tape cells (default 30000)
  --cells <MODE>      unbounded (default) or byte
  --help,  -h         Show this help

Notes:
- Options must come before the code: everything from the first code argument
  on is program text, so code may start with '-' (e.g. "-.").
- Input (`,`) reads one line from stdin and parses it as an integer; bad or
  missing input is reported on stderr and the cell is left unchanged.
- Output (`.`) prints the cell value as a number on its own line.
- The pointer wraps around both ends of the tape.
- Any character that is not a command or a loop bracket is an error.

Examples:
- Load a program from a file:
    {0} run --file ./program.bf
- Feed numbers to `,` from a file:
    {0} run ",[.-]" < numbers.txt
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
