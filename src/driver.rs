// Driver - line-oriented stdin interface
//
// Plays the role of the person interacting with the page: navigate, click
// links, type into fields, submit. Each line becomes one UiEvent on the
// engine's channel. EOF quits, same as `quit`.

use crate::events::UiEvent;
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const HELP: &str = "\
commands:
  go <hash>          navigate (e.g. go #/cadastro)
  click <href>       click an anchor (e.g. click cadastro.html)
  set <id> <value>   type into a form control (e.g. set nome Ana Souza)
  toggle             press the mobile-nav hamburger
  submit             submit the registration form
  show               print the current page state
  help               this text
  quit               exit";

/// Parse one input line into an event. None means the line was handled
/// locally (help, blank) and nothing needs dispatching.
pub fn parse_line(line: &str) -> Option<UiEvent> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "" => None,
        "go" => Some(UiEvent::HashChanged {
            hash: rest.to_string(),
        }),
        "click" => Some(UiEvent::LinkClicked {
            href: rest.to_string(),
        }),
        "set" => {
            let (element_id, value) = match rest.split_once(char::is_whitespace) {
                Some((id, value)) => (id, value.trim()),
                None => (rest, ""),
            };
            if element_id.is_empty() {
                println!("{HELP}");
                return None;
            }
            Some(UiEvent::FieldEdited {
                element_id: element_id.to_string(),
                value: value.to_string(),
            })
        }
        "toggle" => Some(UiEvent::NavTogglePressed),
        "submit" => Some(UiEvent::SubmitRequested { target: None }),
        "show" => Some(UiEvent::PrintState),
        "quit" | "exit" => Some(UiEvent::Quit),
        _ => {
            println!("{HELP}");
            None
        }
    }
}

/// Read stdin until EOF or `quit`, forwarding events to the engine.
///
/// Attached exactly once at boot; when stdin closes, a Quit is sent so the
/// engine winds down.
pub async fn run(events_tx: mpsc::Sender<UiEvent>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(event) = parse_line(&line) {
            let quit = matches!(event, UiEvent::Quit);
            if events_tx.send(event).await.is_err() || quit {
                return Ok(());
            }
        }
    }
    let _ = events_tx.send(UiEvent::Quit).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_and_click() {
        assert!(matches!(
            parse_line("go #/projeto"),
            Some(UiEvent::HashChanged { hash }) if hash == "#/projeto"
        ));
        assert!(matches!(
            parse_line("click cadastro.html"),
            Some(UiEvent::LinkClicked { href }) if href == "cadastro.html"
        ));
    }

    #[test]
    fn test_set_keeps_spaces_in_value() {
        let event = parse_line("set nome Ana Clara Souza");
        assert!(matches!(
            event,
            Some(UiEvent::FieldEdited { element_id, value })
                if element_id == "nome" && value == "Ana Clara Souza"
        ));
    }

    #[test]
    fn test_set_with_empty_value() {
        assert!(matches!(
            parse_line("set nome"),
            Some(UiEvent::FieldEdited { element_id, value })
                if element_id == "nome" && value.is_empty()
        ));
    }

    #[test]
    fn test_blank_and_unknown_lines() {
        assert!(parse_line("").is_none());
        assert!(parse_line("   ").is_none());
        assert!(parse_line("dançar").is_none());
    }

    #[test]
    fn test_quit_variants() {
        assert!(matches!(parse_line("quit"), Some(UiEvent::Quit)));
        assert!(matches!(parse_line("exit"), Some(UiEvent::Quit)));
    }
}
