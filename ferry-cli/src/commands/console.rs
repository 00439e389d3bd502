//! Interactive operator console
//!
//! Reads one command per line from stdin and renders console state to
//! stdout. The console itself lives in `ferry-console`; this module only
//! parses input and draws.

use anyhow::{Context, Result};
use colored::*;
use ferry_console::{
    Connection, Console, ControlsView, OperatorCommand, PickerView, Renderer, spawn_push_listener,
};
use ferry_core::domain::log::{LogEntry, Severity};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::config::Settings;

const HELP: &str = "\
Commands:
  set <field> <value>      Edit a form field (e.g. set magento.base_url https://shop.test)
  show                     Show the current form
  test magento|medusa      Test a connection
  start | stop             Start or stop the migration
  pause | resume           Pause or resume the running migration
  pick <type>              Pick products, categories, customers or orders
  filter [term]            Filter the open picker by label
  toggle <id>              Check or uncheck one picker item
  all | none               Check or uncheck every picker item
  confirm | cancel         Close the picker, keeping or discarding the selection
  clear                    Clear the log
  help                     Show this help
  quit                     Leave the console";

/// One parsed input line
#[derive(Debug, PartialEq, Eq)]
enum Line {
    Empty,
    Help,
    Command(OperatorCommand),
}

fn parse_line(line: &str) -> Result<Line> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "" => return Ok(Line::Empty),
        "help" | "?" => return Ok(Line::Help),
        "set" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            if field.is_empty() {
                anyhow::bail!("Usage: set <field> <value>");
            }
            OperatorCommand::Set {
                field: field.to_string(),
                value: value.to_string(),
            }
        }
        "show" => OperatorCommand::Show,
        "test" => match rest.to_lowercase().as_str() {
            "magento" => OperatorCommand::TestConnection(Connection::Magento),
            "medusa" => OperatorCommand::TestConnection(Connection::Medusa),
            _ => anyhow::bail!("Usage: test magento|medusa"),
        },
        "start" => OperatorCommand::Start,
        "stop" => OperatorCommand::Stop,
        "pause" => OperatorCommand::Pause,
        "resume" => OperatorCommand::Resume,
        "pick" => OperatorCommand::OpenPicker(rest.parse()?),
        "filter" => OperatorCommand::Filter(rest.to_string()),
        "toggle" => {
            if rest.is_empty() {
                anyhow::bail!("Usage: toggle <id>");
            }
            OperatorCommand::Toggle(rest.to_string())
        }
        "all" => OperatorCommand::SelectAll,
        "none" => OperatorCommand::DeselectAll,
        "confirm" => OperatorCommand::Confirm,
        "cancel" => OperatorCommand::Cancel,
        "clear" => OperatorCommand::ClearLog,
        "quit" | "exit" => OperatorCommand::Quit,
        other => anyhow::bail!("Unknown command '{}' (type 'help' for a list)", other),
    };
    Ok(Line::Command(command))
}

/// Run the interactive console until the operator quits
pub async fn run_console(settings: &Settings) -> Result<()> {
    let form = settings
        .load_form()
        .context("Failed to load console defaults")?;
    let client = settings.client();

    println!("{}", "Ferry migration console".bold());
    println!("Runner: {}", client.base_url().cyan());
    println!("{}", "Type 'help' for commands.".dimmed());
    println!();

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (push_tx, push_rx) = mpsc::unbounded_channel();

    let listener = spawn_push_listener(client.clone(), push_tx);
    let input = tokio::spawn(read_input(command_tx));

    let console = Console::new(Arc::new(client), form, TerminalRenderer::default());
    console.run(command_rx, push_rx).await;

    listener.abort();
    input.await.context("Input reader panicked")?
}

async fn read_input(tx: UnboundedSender<OperatorCommand>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match parse_line(&line) {
            Ok(Line::Empty) => {}
            Ok(Line::Help) => println!("{}", HELP),
            Ok(Line::Command(command)) => {
                let quit = command == OperatorCommand::Quit;
                if tx.send(command).is_err() || quit {
                    break;
                }
            }
            Err(e) => println!("{} {}", "!".red().bold(), e),
        }
    }

    Ok(())
}

// =============================================================================
// Rendering
// =============================================================================

/// Colored stdout renderer
#[derive(Default)]
struct TerminalRenderer {
    last_controls: Option<ControlsView>,
}

impl Renderer for TerminalRenderer {
    fn log_appended(&mut self, entry: &LogEntry) {
        let time = entry.timestamp.with_timezone(&chrono::Local).format("%H:%M:%S");
        println!(
            "{} {}",
            format!("[{}]", time).dimmed(),
            colorize_log(entry.severity, &entry.text)
        );
    }

    fn log_cleared(&mut self) {
        println!("{}", "Log cleared.".dimmed());
    }

    fn controls_changed(&mut self, controls: &ControlsView) {
        if self.last_controls.as_ref() == Some(controls) {
            return;
        }
        self.last_controls = Some(*controls);
        println!("{}", format_controls(controls));
    }

    fn picker_changed(&mut self, picker: &PickerView) {
        match picker {
            PickerView::Closed => println!("{}", "Picker closed.".dimmed()),
            PickerView::Loading { entity_type, .. } => {
                println!("{}", format!("Fetching {}...", entity_type).dimmed())
            }
            PickerView::Failed { entity_type, error } => println!(
                "{} {}",
                format!("Could not load {}:", entity_type).red().bold(),
                error.red()
            ),
            PickerView::Ready {
                entity_type,
                filter,
                rows,
                total,
                selected,
            } => {
                let mut header = format!("{}: {} of {} selected", entity_type, selected, total);
                if !filter.is_empty() {
                    header.push_str(&format!(" (filter: '{}')", filter));
                }
                println!("{}", "─".repeat(80).dimmed());
                println!("{}", header.bold());
                if rows.is_empty() {
                    println!("  {}", "No items found".dimmed());
                }
                for row in rows {
                    let mark = if row.checked { "[x]".green() } else { "[ ]".dimmed() };
                    println!("  {} {:>8}  {}", mark, row.id.cyan(), row.label);
                }
                println!("{}", "─".repeat(80).dimmed());
            }
        }
    }

    fn field_changed(&mut self, field: &str, value: &str) {
        println!("  {} = {}", field.bold(), value);
    }

    fn notice(&mut self, message: &str) {
        println!("{} {}", "!".red().bold(), message.bold());
    }

    fn show_form(&mut self, fields: &[(String, String)]) {
        let width = fields.iter().map(|(f, _)| f.len()).max().unwrap_or(0);
        for (field, value) in fields {
            let value = if value.is_empty() {
                "-".dimmed()
            } else {
                value.normal()
            };
            println!("  {:width$}  {}", field.bold(), value, width = width);
        }
    }
}

fn colorize_log(severity: Severity, text: &str) -> ColoredString {
    match severity {
        Severity::Error => text.red(),
        Severity::Warning => text.yellow(),
        Severity::Success => text.green(),
        Severity::Info => text.cyan(),
        Severity::Neutral => text.normal(),
        Severity::System => text.dimmed().italic(),
    }
}

fn format_controls(controls: &ControlsView) -> String {
    let status = if controls.paused {
        "Paused".yellow()
    } else if controls.state.is_running() {
        "Running".green()
    } else {
        "Idle".dimmed()
    };

    let mut actions = Vec::new();
    if controls.start_visible {
        actions.push(if controls.start_enabled { "start" } else { "start (pending)" });
    }
    if controls.stop_visible {
        actions.push("stop");
    }
    if controls.pause_visible {
        actions.push("pause");
    }
    if controls.resume_visible {
        actions.push("resume");
    }
    if controls.magento_test_busy {
        actions.push("testing magento...");
    }
    if controls.medusa_test_busy {
        actions.push("testing medusa...");
    }

    format!("{} {}  [{}]", "Status:".bold(), status, actions.join(", "))
}
