use std::io::BufRead;
use std::sync::mpsc;
use std::thread;

use watch_core::Msg;

use super::app::LoopEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Start(Option<String>),
    SetUrl(String),
    Refetch,
    Stop,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Option<InputCommand> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let command = match word.to_ascii_lowercase().as_str() {
        "start" | "s" if rest.is_empty() => InputCommand::Start(None),
        "start" | "s" => InputCommand::Start(Some(rest.to_string())),
        // An empty argument clears the target.
        "url" | "u" => InputCommand::SetUrl(rest.to_string()),
        "refetch" | "r" => InputCommand::Refetch,
        "stop" => InputCommand::Stop,
        "help" | "h" | "?" => InputCommand::Help,
        "quit" | "q" | "exit" => InputCommand::Quit,
        _ => return None,
    };
    Some(command)
}

/// Reads commands from stdin until EOF. `default_url` is used for a bare
/// `start`.
pub fn spawn_stdin_reader(loop_tx: mpsc::Sender<LoopEvent>, default_url: String) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            let event = match parse_command(&line) {
                Some(InputCommand::Start(url)) => LoopEvent::Msg(Msg::StartRequested(
                    url.unwrap_or_else(|| default_url.clone()),
                )),
                Some(InputCommand::SetUrl(url)) => LoopEvent::Msg(Msg::TargetUrlChanged(url)),
                Some(InputCommand::Refetch) => LoopEvent::Msg(Msg::RefetchRequested),
                Some(InputCommand::Stop) => LoopEvent::Msg(Msg::StopRequested),
                Some(InputCommand::Help) => LoopEvent::Help,
                Some(InputCommand::Quit) => LoopEvent::Quit,
                None => {
                    eprintln!("unknown command: {}", line.trim());
                    LoopEvent::Help
                }
            };
            if loop_tx.send(event).is_err() {
                break;
            }
        }
        log::debug!("stdin closed");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!(parse_command("start"), Some(InputCommand::Start(None)));
        assert_eq!(
            parse_command("  start https://divar.ir/s/karaj  "),
            Some(InputCommand::Start(Some("https://divar.ir/s/karaj".to_string())))
        );
        assert_eq!(
            parse_command("url https://divar.ir/s/qom"),
            Some(InputCommand::SetUrl("https://divar.ir/s/qom".to_string()))
        );
        assert_eq!(parse_command("url"), Some(InputCommand::SetUrl(String::new())));
        assert_eq!(parse_command("R"), Some(InputCommand::Refetch));
        assert_eq!(parse_command("stop"), Some(InputCommand::Stop));
        assert_eq!(parse_command("q"), Some(InputCommand::Quit));
        assert_eq!(parse_command("?"), Some(InputCommand::Help));
    }

    #[test]
    fn unknown_words_are_rejected() {
        assert_eq!(parse_command("fetch-everything"), None);
        assert_eq!(parse_command(""), None);
    }
}
