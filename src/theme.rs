//! Catppuccin Mocha styles for the REPL highlighter.

use nu_ansi_term::{Color, Style};

/// What a character does on the tape, for colouring purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    MoveRight,
    MoveLeft,
    Increment,
    Decrement,
    Output,
    Input,
    Loop,
    Custom,
    Comment,
}

impl Role {
    pub fn of(ch: char, custom: &[char]) -> Role {
        match ch {
            '>' => Role::MoveRight,
            '<' => Role::MoveLeft,
            '+' => Role::Increment,
            '-' => Role::Decrement,
            '.' => Role::Output,
            ',' => Role::Input,
            '[' | ']' => Role::Loop,
            c if custom.contains(&c) => Role::Custom,
            _ => Role::Comment,
        }
    }

    pub fn style(self) -> Style {
        let bold = |c: Color| Style::new().fg(c).bold();
        match self {
            Role::MoveRight => bold(SKY),
            Role::MoveLeft => bold(TEAL),
            Role::Increment => bold(GREEN),
            Role::Decrement => bold(RED),
            Role::Output => bold(YELLOW),
            Role::Input => bold(PEACH),
            Role::Loop => bold(MAUVE),
            Role::Custom => bold(BLUE),
            Role::Comment => Style::new().fg(SURFACE2),
        }
    }
}

const SURFACE2: Color = Color::Rgb(108, 112, 134);
const RED: Color = Color::Rgb(243, 139, 168);
const GREEN: Color = Color::Rgb(166, 227, 161);
const YELLOW: Color = Color::Rgb(249, 226, 175);
const BLUE: Color = Color::Rgb(137, 180, 250);
const MAUVE: Color = Color::Rgb(203, 166, 247);
const PEACH: Color = Color::Rgb(250, 179, 135);
const TEAL: Color = Color::Rgb(148, 226, 213);
const SKY: Color = Color::Rgb(137, 220, 235);
