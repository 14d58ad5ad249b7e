//! Parsing of REPL input lines.

use anyhow::{Result, bail};

/// Slash commands offered for completion and hints.
pub const COMMANDS: &[&str] = &[
    "/models",
    "/select",
    "/toggle",
    "/instruct",
    "/remove",
    "/selected",
    "/fav",
    "/rooms",
    "/room",
    "/new",
    "/create",
    "/rename",
    "/delete",
    "/clear",
    "/clearmodels",
    "/history",
    "/help",
];

pub const HELP: &str = "\
Commands:
  <text>                    send a message to every active model
  /models [term]            browse the model catalog (favorites first)
  /select <id>              add or remove a model from this room
  /toggle <id>              switch a selected model on or off
  /instruct <id> <text>     set the model's custom instruction
  /remove <id>              remove a model from this room
  /selected                 list the models selected in this room
  /fav <id>                 add or remove a favorite model
  /rooms [term]             list rooms, optionally filtered by name
  /room <n>                 switch to room n
  /new                      start a new chat
  /create                   create a room with the current models
  /rename <n> <name>        rename room n
  /delete <n>               delete room n
  /clear                    clear the chat view
  /clearmodels              deselect every model
  /history                  show this room's transcript
  quit | exit               leave";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    Models(String),
    Select(String),
    Toggle(String),
    Instruct {
        model_id: String,
        instruction: String,
    },
    Remove(String),
    Selected,
    Favorite(String),
    Rooms(String),
    Room(usize),
    New,
    Create,
    Rename {
        index: usize,
        name: String,
    },
    Delete(usize),
    Clear,
    ClearModels,
    History,
    Help,
    Quit,
}

impl Command {
    /// Parses a non-empty input line. Room numbers are 1-based on input and
    /// returned as 0-based indices.
    pub fn parse(line: &str) -> Result<Self> {
        let trimmed = line.trim();
        if trimmed == "quit" || trimmed == "exit" {
            return Ok(Self::Quit);
        }
        if !trimmed.starts_with('/') {
            return Ok(Self::Send(line.to_string()));
        }

        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };

        let command = match name {
            "/models" => Self::Models(rest.to_string()),
            "/select" => Self::Select(required(rest, "/select <model-id>")?),
            "/toggle" => Self::Toggle(required(rest, "/toggle <model-id>")?),
            "/instruct" => {
                let Some((model_id, instruction)) = rest.split_once(char::is_whitespace) else {
                    bail!("usage: /instruct <model-id> <instruction>");
                };
                Self::Instruct {
                    model_id: model_id.to_string(),
                    instruction: instruction.trim().to_string(),
                }
            }
            "/remove" => Self::Remove(required(rest, "/remove <model-id>")?),
            "/selected" => Self::Selected,
            "/fav" => Self::Favorite(required(rest, "/fav <model-id>")?),
            "/rooms" => Self::Rooms(rest.to_string()),
            "/room" => Self::Room(room_index(rest, "/room <n>")?),
            "/new" => Self::New,
            "/create" => Self::Create,
            "/rename" => {
                let (number, name) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Self::Rename {
                    index: room_index(number, "/rename <n> <name>")?,
                    name: required(name, "/rename <n> <name>")?,
                }
            }
            "/delete" => Self::Delete(room_index(rest, "/delete <n>")?),
            "/clear" => Self::Clear,
            "/clearmodels" => Self::ClearModels,
            "/history" => Self::History,
            "/help" => Self::Help,
            other => bail!("unknown command: {other} (try /help)"),
        };
        Ok(command)
    }
}

fn required(value: &str, usage: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        bail!("usage: {usage}");
    }
    Ok(value.to_string())
}

fn room_index(value: &str, usage: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(number) if number >= 1 => Ok(number - 1),
        _ => bail!("usage: {usage} (room numbers start at 1)"),
    }
}
