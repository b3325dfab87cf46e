use std::env;
use std::io::{self, Write};

use clap::{Parser, Subcommand};
use tapebf::commands::repl::{self, ReplArgs};
use tapebf::commands::run::{self, RunArgs};
use tapebf::logging;

fn print_top_usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [OPTIONS] <code>...       Execute a program given on the command line
  {0} run [OPTIONS] --file <PATH>   Execute a program stored in a file
  {0} repl [OPTIONS]                Interactive session (also the default)

"{0} <command> --help" lists the options of a command.
Config: $TAPEBF_CONFIG or <config dir>/tapebf.toml, then TAPEBF_* variables.
Logging: RUST_LOG=tapebf=debug (default level: warn).
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "tapebf", disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Run(RunArgs),
    Repl(ReplArgs),
}

fn main() {
    logging::init();

    let program = env::args().next().unwrap_or_else(|| String::from("tapebf"));

    let cli = Cli::parse();

    if cli.help {
        print_top_usage_and_exit(&program, 0);
    }

    let code = match cli.command {
        Some(Command::Run(args)) => run::run(&program, args),
        Some(Command::Repl(args)) => repl::run(&program, args),
        None => repl::run(&program, ReplArgs::default()),
    };

    std::process::exit(code);
}
