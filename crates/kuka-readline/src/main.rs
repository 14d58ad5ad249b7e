mod command;
mod helper;
mod logging;

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;

use kuka_application::{ChatService, DispatchOutcome};
use kuka_core::message::{Message, MessageRole};
use kuka_core::notice::Notice;
use kuka_infrastructure::{ConfigService, FileFavoritesRepository, KukaPaths};
use kuka_interaction::OpenRouterClient;

use crate::command::{Command, HELP};
use crate::helper::CliHelper;

/// Entry point for the `kuka` REPL.
///
/// Loads config and the API key, starts the notice printer, fetches the
/// catalog and favorites, then reads commands until `quit` or Ctrl-D.
/// Messages are dispatched on background tasks so the prompt stays usable
/// while models answer.
#[tokio::main]
async fn main() -> Result<()> {
    let paths = KukaPaths::new(None);
    let _log_guard = logging::init(&paths);

    // ===== Backend Initialization =====
    let config = ConfigService::new(&paths)?
        .load()
        .context("failed to load config.toml")?;

    let client = Arc::new(
        OpenRouterClient::try_from_env(&paths, &config.api)
            .context("no API key: set OPENROUTER_API_KEY or add it to secret.json")?,
    );
    let favorites = Arc::new(FileFavoritesRepository::new(&paths)?);

    let (notice_tx, notice_rx) = mpsc::unbounded_channel();
    let service =
        ChatService::new(client.clone(), client, favorites, notice_tx).with_retry(config.retry);

    let notice_printer = tokio::spawn(print_notices(notice_rx));

    println!("{}", "=== KukaChat ===".bright_magenta().bold());
    println!("{}", "Loading models...".bright_black());
    service.initialize().await;
    let catalog = service.catalog().await;
    println!(
        "{}",
        format!(
            "{} models available. Type /help for commands, or 'quit' to exit.",
            catalog.len()
        )
        .bright_black()
    );
    println!();
    tracing::info!(models = catalog.len(), "session started");

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    // ===== Main REPL Loop =====
    loop {
        let prompt = format!("{}> ", service.active_room().await.name);
        match rl.readline(&prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                let command = match Command::parse(&line) {
                    Ok(command) => command,
                    Err(err) => {
                        println!("{}", err.to_string().yellow());
                        continue;
                    }
                };

                match command {
                    Command::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Command::Send(text) => {
                        println!("{}", format!("> {}", text.trim()).green());
                        let service = service.clone();
                        tokio::spawn(async move {
                            let outcome = service.send_message(&text).await;
                            print_outcome(&service, outcome).await;
                        });
                    }
                    Command::Delete(index) => {
                        let rooms = service.rooms().await;
                        let Some(room) = rooms.get(index) else {
                            println!("{}", format!("No room {}", index + 1).yellow());
                            continue;
                        };
                        let question = format!("Delete room '{}'? (y/n) ", room.name);
                        let answer = rl.readline(&question).unwrap_or_default();
                        if answer.trim().eq_ignore_ascii_case("y") {
                            if let Some(removed) = service.delete_room(index).await {
                                println!("{}", format!("Deleted '{}'", removed.name).bright_black());
                            }
                        }
                    }
                    other => run_command(&service, other).await,
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    notice_printer.abort();
    Ok(())
}

async fn run_command(service: &ChatService, command: Command) {
    match command {
        Command::Models(term) => {
            let entries = service.browse(&term).await;
            if entries.is_empty() {
                println!("{}", "No models found.".bright_black());
            }
            for entry in entries {
                let star = if entry.favorite { "★" } else { " " };
                let check = if entry.selected { "✓" } else { " " };
                println!(
                    "{} {} {} {}",
                    star.bright_yellow(),
                    check.bright_green(),
                    entry.model.id.bright_cyan(),
                    entry.model.name.bright_black()
                );
            }
        }
        Command::Select(model_id) => {
            let selected = service.toggle_select(&model_id).await;
            let verb = if selected { "Selected" } else { "Deselected" };
            println!("{}", format!("{verb} {model_id}").bright_black());
        }
        Command::Toggle(model_id) => match service.toggle_model_active(&model_id).await {
            Some(true) => println!("{}", format!("{model_id} is on").bright_black()),
            Some(false) => println!("{}", format!("{model_id} is off").bright_black()),
            None => println!("{}", format!("{model_id} is not selected").yellow()),
        },
        Command::Instruct {
            model_id,
            instruction,
        } => {
            service.set_instruction(&model_id, &instruction).await;
        }
        Command::Remove(model_id) => service.remove_model(&model_id).await,
        Command::Selected => {
            let selection = service.selection().await;
            if selection.is_empty() {
                println!("{}", "No models selected.".bright_black());
            }
            for entry in selection.iter() {
                let state = if entry.active { "on " } else { "off" };
                let name = service.display_name(&entry.id).await;
                println!("[{}] {} ({})", state, name.bright_cyan(), entry.id);
                if !entry.custom_instruction.is_empty() {
                    println!("      {}", entry.custom_instruction.bright_black());
                }
            }
        }
        Command::Favorite(model_id) => {
            let favorite = service.toggle_favorite(&model_id).await;
            let verb = if favorite { "Added" } else { "Removed" };
            println!("{}", format!("{verb} favorite {model_id}").bright_black());
        }
        Command::Rooms(term) => {
            for room in service.search_rooms(&term).await {
                let marker = if room.active { "*" } else { " " };
                println!(
                    "{} {:>2}. {} {}",
                    marker.bright_green(),
                    room.index + 1,
                    room.name,
                    format!("({} messages)", room.message_count).bright_black()
                );
            }
        }
        Command::Room(index) => {
            if service.switch_room(index).await {
                print_transcript(&service.transcript().await);
            }
        }
        Command::New => {
            let room = service.new_chat().await;
            println!("{}", format!("Started '{}'", room.name).bright_black());
        }
        Command::Create => {
            if let Some(index) = service.create_room().await {
                println!("{}", format!("Created room {}", index + 1).bright_black());
            }
        }
        Command::Rename { index, name } => {
            if !service.rename_room(index, &name).await {
                println!("{}", format!("No room {}", index + 1).yellow());
            }
        }
        Command::Clear => service.clear_chat().await,
        Command::ClearModels => service.clear_models().await,
        Command::History => print_transcript(&service.transcript().await),
        Command::Help => println!("{}", HELP.bright_black()),
        Command::Send(_) | Command::Delete(_) | Command::Quit => {}
    }
}

async fn print_outcome(service: &ChatService, outcome: DispatchOutcome) {
    let DispatchOutcome::Completed { room_id, replies } = outcome else {
        return;
    };

    if service.active_room().await.id == room_id {
        print_transcript(&replies);
        return;
    }
    if let Some(room) = service.rooms().await.into_iter().find(|room| room.id == room_id) {
        println!(
            "{}",
            format!("{} replies arrived in '{}'", replies.len(), room.name).bright_black()
        );
    }
}

fn print_transcript(messages: &[Message]) {
    for message in messages {
        match (&message.role, &message.model_id) {
            (MessageRole::Assistant, Some(model_id)) => {
                println!("{}", format!("[{}]", model_id).bright_magenta());
                for line in message.content.lines() {
                    println!("{}", line.bright_blue());
                }
                println!();
            }
            _ => println!("{}", message.display_line().green()),
        }
    }
}

async fn print_notices(mut notices: mpsc::UnboundedReceiver<Notice>) {
    while let Some(notice) = notices.recv().await {
        let line = format!("{}: {}", notice.title, notice.description);
        if notice.is_destructive() {
            println!("{}", line.red());
        } else {
            println!("{}", line.yellow());
        }
    }
}
