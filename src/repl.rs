use std::env;
use std::io::{self, IsTerminal, Write};

use reedline::{DefaultPrompt, DefaultPromptSegment, Highlighter, HistoryItem, Signal, StyledText};

use crate::cli_util::print_execution_error;
use crate::interpreter::Interpreter;
use crate::instructions_only;
use crate::theme::Role;

/// Cells shown by the `:tape` meta command.
const TAPE_VIEW_CELLS: usize = 16;

/// Outcome of a `:`-prefixed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meta {
    Exit,
    Help,
    Reset,
    Tape,
    Unknown,
}

impl Meta {
    /// Parse a meta command; `None` if `line` is program text.
    pub fn parse(line: &str) -> Option<Meta> {
        let cmd = line.trim().strip_prefix(':')?;
        Some(match cmd.trim() {
            "exit" | "quit" | "q" => Meta::Exit,
            "help" | "h" => Meta::Help,
            "reset" => Meta::Reset,
            "tape" => Meta::Tape,
            _ => Meta::Unknown,
        })
    }
}

pub fn repl_loop(bf: &mut Interpreter) -> io::Result<()> {
    // Initialize interactive line editor
    let mut editor = init_line_editor(custom_names(bf))?;

    loop {
        // Prompt and read a multi-line submission via editor
        let Some(submission) = read_submission_interactive(&mut editor)? else {
            // EOF or editor closed. End the session cleanly to avoid hanging when stdin is closed
            println!();
            io::stdout().flush()?;
            return Ok(());
        };

        let trimmed = submission.trim();
        if trimmed.is_empty() {
            continue; // Ignore empty submissions
        }

        if let Some(meta) = Meta::parse(trimmed) {
            match meta {
                Meta::Exit => return Ok(()),
                Meta::Help => print_meta_help(),
                Meta::Reset => {
                    bf.reset();
                    eprintln!("tape reset");
                }
                Meta::Tape => print_tape(bf),
                Meta::Unknown => eprintln!("unknown meta command {trimmed:?} (try :help)"),
            }
            let _ = io::stderr().flush();
            continue;
        }

        let filtered = instructions_only(trimmed, &custom_names(bf));
        if filtered.is_empty() {
            continue;
        }

        execute_buffer(bf, &filtered);

        // Test hook: if TAPEBF_REPL_ONCE=1, exit after one execution
        if env::var("TAPEBF_REPL_ONCE").ok().as_deref() == Some("1") {
            return Ok(());
        }
    }
}

fn custom_names(bf: &Interpreter) -> Vec<char> {
    bf.registry().custom_names().collect()
}

fn init_line_editor(custom: Vec<char>) -> io::Result<reedline::Reedline> {
    use reedline::{
        default_emacs_keybindings, EditCommand, Emacs, KeyCode, KeyModifiers, Reedline, ReedlineEvent,
    };

    // Start from default emacs-like bindings and adjust:
    // - Enter -> InsertNewLine (do not submit)
    // - Ctrl+D -> AcceptLine (submit)
    // - Ctrl+Z -> AcceptLine (submit, for Windows)
    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Enter, ReedlineEvent::Edit(vec![EditCommand::InsertNewline]));
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('d'), ReedlineEvent::Submit);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('z'), ReedlineEvent::Submit);

    // Up/down move within the current multiline buffer; Alt/Ctrl+Up/Down browse history.
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Up, ReedlineEvent::Up);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Down, ReedlineEvent::Down);
    keybindings.add_binding(KeyModifiers::ALT, KeyCode::Up, ReedlineEvent::PreviousHistory);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Up, ReedlineEvent::PreviousHistory);
    keybindings.add_binding(KeyModifiers::ALT, KeyCode::Down, ReedlineEvent::NextHistory);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Down, ReedlineEvent::NextHistory);

    let history = reedline::FileBackedHistory::new(1_000).map_err(|e| io::Error::other(e.to_string()))?;

    let editor = Reedline::create()
        .with_highlighter(Box::new(TapeHighlighter { custom }))
        .with_history(Box::new(history))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    Ok(editor)
}

/// Everything up to EOF as one submission; `None` if nothing was read.
pub fn read_submission<R: io::BufRead>(input: &mut R) -> Option<String> {
    let mut buffer = String::new();
    match input.read_to_string(&mut buffer) {
        Ok(_) if !buffer.is_empty() => Some(buffer),
        _ => None,
    }
}

fn read_submission_interactive(editor: &mut reedline::Reedline) -> io::Result<Option<String>> {
    let prompt = DefaultPrompt::new(DefaultPromptSegment::Basic("tapebf".to_string()), DefaultPromptSegment::Empty);

    // Enter inserts a newline; Ctrl+D or Ctrl+Z submits
    match editor.read_line(&prompt) {
        Ok(Signal::Success(buffer)) => {
            // Add one history item per submitted buffer (program-level)
            if !buffer.trim().is_empty() {
                let _ = editor.history_mut().save(HistoryItem::from_command_line(buffer.clone()));
            }
            Ok(Some(buffer))
        }
        Ok(Signal::CtrlC) => Ok(None),
        Ok(Signal::CtrlD) => Ok(None),
        Err(e) => {
            eprintln!("repl: editor error: {e}");
            let _ = io::stderr().flush();
            Ok(None)
        }
    }
}

/// Executes one submission on the session interpreter.
/// - Program output goes to the interpreter's sink (stdout for the CLI).
/// - Errors are printed concisely to stderr.
/// - The tape is kept for the next submission; `:reset` clears it.
pub fn execute_buffer(bf: &mut Interpreter, buffer: &str) {
    if let Err(err) = bf.execute(buffer) {
        print_execution_error(None, buffer, &err);
    }
    let _ = io::stdout().flush();
}

fn print_tape(bf: &Interpreter) {
    let tape = bf.tape();
    let (base, cells) = tape.window(TAPE_VIEW_CELLS);
    let row: Vec<String> = cells
        .iter()
        .enumerate()
        .map(|(i, v)| if base + i == tape.pointer() { format!("[{v}]") } else { v.to_string() })
        .collect();
    println!("ptr={} cells[{}..{}]: {}", tape.pointer(), base, base + cells.len(), row.join(" "));
    let _ = io::stdout().flush();
}

fn print_meta_help() {
    eprintln!(
        r#"Meta commands:
  :exit    Leave the REPL
  :help    Show this help
  :reset   Zero the tape and move the pointer to cell 0
  :tape    Show the cells around the pointer"#
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplMode {
    Bare,
    Editor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeFlagOverride {
    None,
    Bare,
    Editor,
}

pub fn select_mode(flag: ModeFlagOverride) -> Result<ReplMode, String> {
    // Flag override
    match flag {
        ModeFlagOverride::Bare => return Ok(ReplMode::Bare),
        ModeFlagOverride::Editor => {
            if !io::stdin().is_terminal() {
                return Err("cannot start editor: stdin is not a TTY (use --bare or TAPEBF_REPL_MODE=bare)".to_string());
            }
            return Ok(ReplMode::Editor);
        }
        ModeFlagOverride::None => {}
    }

    // Environment override
    if let Ok(val) = env::var("TAPEBF_REPL_MODE") {
        let v = val.trim().to_ascii_lowercase();
        return match v.as_str() {
            "bare" => Ok(ReplMode::Bare),
            "editor" => {
                if !io::stdin().is_terminal() {
                    return Err("cannot start editor: stdin is not a TTY (use TAPEBF_REPL_MODE=bare)".to_string());
                }
                Ok(ReplMode::Editor)
            }
            _ => Err(format!("invalid TAPEBF_REPL_MODE value: {val}, must be 'bare' or 'editor'")),
        };
    }

    // Auto-detect
    if io::stdin().is_terminal() {
        Ok(ReplMode::Editor)
    } else {
        Ok(ReplMode::Bare)
    }
}

/// Read stdin to EOF and execute it once as a single program.
pub fn execute_bare_once(bf: &mut Interpreter) -> io::Result<()> {
    // Release the stdin lock before running; `,` reads from stdin too.
    let submission = {
        let mut locked = io::BufReader::new(io::stdin().lock());
        read_submission(&mut locked)
    };
    if let Some(s) = submission {
        let filtered = instructions_only(s.trim(), &custom_names(bf));
        if !filtered.is_empty() {
            execute_buffer(bf, &filtered);
        }
    }
    Ok(())
}

/// Colours each character by the role it plays on the tape.
struct TapeHighlighter {
    custom: Vec<char>,
}

impl Highlighter for TapeHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut out = StyledText::new();
        let mut run: Option<(Role, String)> = None;

        for ch in line.chars() {
            let role = Role::of(ch, &self.custom);
            match run.as_mut() {
                Some((current, text)) if *current == role => text.push(ch),
                _ => {
                    if let Some((current, text)) = run.replace((role, ch.to_string())) {
                        out.push((current.style(), text));
                    }
                }
            }
        }

        if let Some((current, text)) = run {
            out.push((current.style(), text));
        }
        out
    }
}
