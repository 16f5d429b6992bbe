//! Debug commands available from the in-game console.
//!
//! The console never evaluates arbitrary expressions. Every line is parsed
//! into one of the [`DebugCommand`] variants below, with typed arguments,
//! and anything else is rejected with a [`CommandError`].

use thiserror::Error;

use crate::camera::{CameraTarget, Offset};
use crate::console::Evaluator;
use crate::math::Vec2;
use crate::views::{GameOver, Outcome};

/// Why a console line could not be run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("nothing to evaluate")]
    Empty,
    #[error("unknown command `{0}` (try `help`)")]
    UnknownCommand(String),
    #[error("`{command}` expects argument <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("`{command}`: <{argument}> must be a number, got `{value}`")]
    InvalidNumber {
        command: &'static str,
        argument: &'static str,
        value: String,
    },
    #[error("`{command}` takes at most {max} argument(s)")]
    TooManyArguments { command: &'static str, max: usize },
}

/// Name, usage and description of every command, in `help` order.
pub const COMMANDS: &[(&str, &str, &str)] = &[
    ("help", "help", "list available commands"),
    ("echo", "echo <text...>", "print the text back"),
    ("pos", "pos", "camera target position"),
    ("vel", "vel", "camera target velocity"),
    ("offset", "offset", "current camera offset"),
    ("tick", "tick", "ticks since the game started"),
    ("click", "click", "world position of the last left click"),
    ("teleport", "teleport <x> <y>", "move the camera target"),
    ("win", "win [message...]", "end the game as a win"),
    ("lose", "lose [message...]", "end the game as a loss"),
];

/// A parsed console command.
#[derive(Debug, Clone, PartialEq)]
pub enum DebugCommand {
    Help,
    Echo(String),
    Position,
    Velocity,
    Offset,
    Tick,
    Click,
    Teleport { x: f64, y: f64 },
    End { outcome: Outcome, message: Option<String> },
}

impl DebugCommand {
    /// Parse a console line (prompt marker already stripped).
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let mut words = input.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        let command = match name {
            "help" => no_args("help", &args, Self::Help)?,
            "echo" => Self::Echo(args.join(" ")),
            "pos" => no_args("pos", &args, Self::Position)?,
            "vel" => no_args("vel", &args, Self::Velocity)?,
            "offset" => no_args("offset", &args, Self::Offset)?,
            "tick" => no_args("tick", &args, Self::Tick)?,
            "click" => no_args("click", &args, Self::Click)?,
            "teleport" => {
                if args.len() > 2 {
                    return Err(CommandError::TooManyArguments {
                        command: "teleport",
                        max: 2,
                    });
                }
                let x = number_arg("teleport", "x", args.first())?;
                let y = number_arg("teleport", "y", args.get(1))?;
                Self::Teleport { x, y }
            }
            "win" | "lose" => {
                let outcome = if name == "win" { Outcome::Win } else { Outcome::Lose };
                let message = (!args.is_empty()).then(|| args.join(" "));
                Self::End { outcome, message }
            }
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

fn no_args(
    command: &'static str,
    args: &[&str],
    parsed: DebugCommand,
) -> Result<DebugCommand, CommandError> {
    if args.is_empty() {
        Ok(parsed)
    } else {
        Err(CommandError::TooManyArguments { command, max: 0 })
    }
}

fn number_arg(
    command: &'static str,
    argument: &'static str,
    value: Option<&&str>,
) -> Result<f64, CommandError> {
    let value = value.ok_or(CommandError::MissingArgument { command, argument })?;
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CommandError::InvalidNumber {
            command,
            argument,
            value: value.to_string(),
        })
}

/// Evaluator backed by the live gameplay state.
///
/// Borrowed from a [`crate::views::PlayingView`] for the duration of one
/// console submission.
pub struct DebugShell<'a> {
    pub target: &'a mut CameraTarget,
    pub offset: Offset,
    pub tick: u64,
    pub last_click: Option<Vec2>,
    /// Set by `win`/`lose`; the owning view turns it into a transition.
    pub game_over: &'a mut Option<GameOver>,
}

impl DebugShell<'_> {
    fn run(&mut self, command: DebugCommand) -> String {
        match command {
            DebugCommand::Help => COMMANDS
                .iter()
                .map(|(_, usage, description)| format!("{usage} - {description}"))
                .collect::<Vec<_>>()
                .join("; "),
            DebugCommand::Echo(text) => text,
            DebugCommand::Position => self.target.position.to_string(),
            DebugCommand::Velocity => self.target.velocity.to_string(),
            DebugCommand::Offset => self.offset.to_string(),
            DebugCommand::Tick => self.tick.to_string(),
            DebugCommand::Click => self
                .last_click
                .map(|p| p.to_string())
                .unwrap_or_else(|| "none".to_string()),
            DebugCommand::Teleport { x, y } => {
                self.target.position = Vec2::new(x, y);
                format!("teleported to {}", self.target.position)
            }
            DebugCommand::End { outcome, message } => {
                let game_over = match message {
                    Some(message) => GameOver::new(outcome, message),
                    None => GameOver::with_default_message(outcome),
                };
                let reply = format!("ending game: {}", game_over.message);
                *self.game_over = Some(game_over);
                reply
            }
        }
    }
}

impl Evaluator for DebugShell<'_> {
    fn evaluate(&mut self, input: &str) -> Result<String, CommandError> {
        let command = DebugCommand::parse(input)?;
        Ok(self.run(command))
    }
}
