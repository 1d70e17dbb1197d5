//! Menu commands read from stdin while the daemon runs.
//!
//! One command per line: `search`, `about` or `quit`.

use std::io::{self, BufRead};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use whirl_core::{ControllerEvent, MenuAction, Result};

/// Parses one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<Result<MenuAction>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(line.parse())
}

/// Forwards every valid command from `reader` until EOF or until the
/// controller hangs up.
pub fn forward_commands<R: BufRead>(reader: R, events: &Sender<ControllerEvent>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::warn!("Stopped reading commands: {}", e);
                return;
            }
        };

        match parse_line(&line) {
            Some(Ok(action)) => {
                if events.send(ControllerEvent::Menu(action)).is_err() {
                    return;
                }
            }
            Some(Err(e)) => log::warn!("{} (expected search, about or quit)", e),
            None => {}
        }
    }
    log::debug!("stdin closed, no more menu commands");
}

pub fn spawn_stdin_commands(events: Sender<ControllerEvent>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("whirl-stdin".into())
        .spawn(move || forward_commands(io::stdin().lock(), &events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::mpsc::channel;

    #[test]
    fn test_parse_line() {
        assert!(parse_line("   ").is_none());
        assert!(matches!(parse_line("search\n"), Some(Ok(MenuAction::Search))));
        assert!(matches!(parse_line(" QUIT "), Some(Ok(MenuAction::Quit))));
        assert!(matches!(parse_line("dance"), Some(Err(_))));
    }

    #[test]
    fn test_forward_commands_skips_unknown_lines() {
        let (tx, rx) = channel();
        let input = Cursor::new("about\n\nbogus\nsearch\nquit\n");

        forward_commands(input, &tx);
        drop(tx);

        let actions: Vec<MenuAction> = rx
            .iter()
            .map(|event| match event {
                ControllerEvent::Menu(action) => action,
                other => panic!("unexpected event {:?}", other),
            })
            .collect();
        assert_eq!(
            actions,
            vec![MenuAction::About, MenuAction::Search, MenuAction::Quit]
        );
    }

    #[test]
    fn test_forward_commands_stops_when_controller_is_gone() {
        let (tx, rx) = channel();
        drop(rx);
        forward_commands(Cursor::new("search\nsearch\n"), &tx);
    }
}
