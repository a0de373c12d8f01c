//! Line commands of the interactive shell

use std::str::FromStr;

use crate::cli::error::CliError;
use crate::domain::{Point, Region};

pub const HELP: &str = "\
commands:
  add X Y | add X,Y     place a point (the first one is the start)
  step [N]              advance N steps (default 1)
  undo                  remove the last point, drop tree and tour
  reset                 clear everything
  random N [X,Y,W,H]    replace points with N random ones
  auto                  step on the timer until the cycle closes
  stop                  stop the timer
  show                  print the current state
  tree                  print the attachment tree
  help                  this text
  quit                  leave";

/// One parsed shell line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    Add(Point),
    Step(usize),
    Undo,
    Reset,
    Random {
        count: usize,
        region: Option<Region>,
    },
    Auto,
    Stop,
    Show,
    Tree,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CliError::Usage("empty command".to_string()));
        };
        let args: Vec<&str> = words.collect();

        let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("add" | "a", [xy]) => ShellCommand::Add(xy.parse()?),
            ("add" | "a", [x, y]) => ShellCommand::Add(Point::new(int(x)?, int(y)?)),
            ("step" | "s" | "next" | "n", []) => ShellCommand::Step(1),
            ("step" | "s" | "next" | "n", [n]) => ShellCommand::Step(count(n)?),
            ("undo" | "u", []) => ShellCommand::Undo,
            ("reset" | "clear", []) => ShellCommand::Reset,
            ("random" | "r", [n]) => ShellCommand::Random {
                count: count(n)?,
                region: None,
            },
            ("random" | "r", [n, region]) => ShellCommand::Random {
                count: count(n)?,
                region: Some(region.parse()?),
            },
            ("auto", []) => ShellCommand::Auto,
            ("stop", []) => ShellCommand::Stop,
            ("show" | "ls", []) => ShellCommand::Show,
            ("tree", []) => ShellCommand::Tree,
            ("help" | "?", []) => ShellCommand::Help,
            ("quit" | "exit" | "q", []) => ShellCommand::Quit,
            _ => {
                return Err(CliError::Usage(format!(
                    "unknown command '{}', try 'help'",
                    line.trim()
                )))
            }
        };
        Ok(command)
    }
}

fn int(s: &str) -> Result<i32, CliError> {
    s.parse()
        .map_err(|_| CliError::InvalidArgs(format!("not an integer: {s}")))
}

fn count(s: &str) -> Result<usize, CliError> {
    s.parse()
        .map_err(|_| CliError::InvalidArgs(format!("not a count: {s}")))
}
