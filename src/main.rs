use anyhow::Context;
use colored::Colorize;
use dotenv::dotenv;
use hotelbot::{
    config::initialize_config, logging::init_logging, ChatSession, ConnectionState,
};
use log::{debug, info};
use rustyline::{error::ReadlineError, DefaultEditor};
use tokio::sync::mpsc;

const PROMPT: &str = "you> ";

const HELP: &str = "commands:
  /status     show the connection state
  /reconnect  check the connection again
  /history    print the conversation so far
  /clear      start a new conversation
  /help       show this help
  /quit       exit";

enum Input {
    Line(String),
    Eof,
}

fn status_line(state: ConnectionState) -> String {
    let label = format!("[{}]", state);
    match state {
        ConnectionState::Connected => label.green().to_string(),
        ConnectionState::Checking | ConnectionState::WarmingUp => label.yellow().to_string(),
        ConnectionState::Disconnected => label.red().to_string(),
    }
}

fn print_bot(text: &str, is_fallback: bool) {
    let marker = if is_fallback { " (fallback)".dimmed().to_string() } else { String::new() };
    println!("{}{} {}", "bot>".cyan().bold(), marker, text);
}

/// Reads lines on a plain thread; rustyline blocks.
fn spawn_reader(tx: mpsc::Sender<Input>) {
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                eprintln!("failed to start line editor: {}", e);
                let _ = tx.blocking_send(Input::Eof);
                return;
            }
        };

        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    if tx.blocking_send(Input::Line(line)).is_err() {
                        return;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    let _ = tx.blocking_send(Input::Eof);
                    return;
                }
                Err(e) => {
                    eprintln!("input error: {}", e);
                    let _ = tx.blocking_send(Input::Eof);
                    return;
                }
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = initialize_config().context("failed to load configuration")?;
    init_logging(&config.log_level);
    info!("connecting to {}", config.api_base_url);

    let mut session = ChatSession::connect(
        &config,
        |state| println!("{}", status_line(state)),
        |title, message| eprintln!("{} {}", format!("{}:", title).red().bold(), message),
    );

    for message in session.store().messages() {
        print_bot(message.content(), false);
    }
    println!("{}", "type /help for commands".dimmed());

    let (tx, mut rx) = mpsc::channel(8);
    spawn_reader(tx);

    while let Some(input) = rx.recv().await {
        let line = match input {
            Input::Line(line) => line,
            Input::Eof => break,
        };

        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/help" => println!("{}", HELP),
            "/status" => println!("{}", status_line(session.state())),
            "/reconnect" => session.reconnect(),
            "/clear" => {
                session.clear();
                for message in session.store().messages() {
                    print_bot(message.content(), false);
                }
            }
            "/history" => {
                for message in session.store().messages() {
                    let who = if message.is_user() { "you" } else { "bot" };
                    println!(
                        "{} {}: {}",
                        message.timestamp().format("%H:%M").to_string().dimmed(),
                        who,
                        message.content()
                    );
                }
            }
            text => {
                let outcome = session.submit(text).await;
                debug!("send outcome: {:?}", outcome);
                if let Some(response) = outcome.response.as_deref() {
                    print_bot(response, outcome.is_fallback);
                }
            }
        }
    }

    session.shutdown();
    Ok(())
}
