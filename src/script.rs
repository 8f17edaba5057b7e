//! Line-oriented drawing scripts.
//!
//! One command per line; blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! shape rectangle
//! color #FF8000
//! fill on
//! draw 10 10 200 120
//! undo
//! redo
//! clear
//! save My sketch
//! load My sketch
//! delete My sketch
//! stats
//! ```

use crate::draw::{Color, ShapeKind, Surface};
use crate::events::Statistics;
use crate::session::{Session, StatusLevel, StatusMessage};
use crate::store::SnapshotStore;
use crate::util;
use anyhow::{Result, anyhow};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Shape(ShapeKind),
    Color(Color),
    Fill(bool),
    Draw { x1: f64, y1: f64, x2: f64, y2: f64 },
    Undo,
    Redo,
    Clear,
    Save(String),
    Load(String),
    Delete(String),
    List,
    Stats,
}

impl Command {
    /// Parse one line. Returns `Ok(None)` for blank lines and comments.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "shape" | "tool" => Command::Shape(rest.parse::<ShapeKind>()?),
            "color" | "colour" => Command::Color(parse_color(rest)?),
            "fill" => Command::Fill(parse_switch(rest)?),
            "draw" => {
                let coords = rest
                    .split_whitespace()
                    .map(|token| {
                        token
                            .parse::<f64>()
                            .ok()
                            .filter(|value| value.is_finite())
                            .ok_or_else(|| format!("Invalid coordinate '{token}'"))
                    })
                    .collect::<Result<Vec<f64>, String>>()?;
                let [x1, y1, x2, y2] = coords[..] else {
                    return Err(format!(
                        "draw expects 4 coordinates, got {}",
                        coords.len()
                    ));
                };
                Command::Draw { x1, y1, x2, y2 }
            }
            "undo" => Command::Undo,
            "redo" => Command::Redo,
            "clear" | "new" => Command::Clear,
            "save" => Command::Save(required_name(word, rest)?),
            "load" | "open" => Command::Load(required_name(word, rest)?),
            "delete" => Command::Delete(required_name(word, rest)?),
            "list" => Command::List,
            "stats" => Command::Stats,
            other => return Err(format!("Unknown command '{other}'")),
        };

        Ok(Some(command))
    }
}

fn parse_color(raw: &str) -> Result<Color, String> {
    if raw.is_empty() {
        return Err("color expects a name or #RRGGBB".to_string());
    }
    match util::parse_color_lossy(raw) {
        (color, true) => Ok(color),
        (_, false) => Err(format!("Unknown color '{raw}'")),
    }
}

fn parse_switch(raw: &str) -> Result<bool, String> {
    match raw.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(format!("fill expects on or off, got '{other}'")),
    }
}

fn required_name(command: &str, rest: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("{command} expects a drawing name"))
    } else {
        Ok(rest.to_string())
    }
}

/// Parses a whole script, reporting the first bad line with its number.
pub fn parse_script(text: &str) -> Result<Vec<(usize, Command)>> {
    let mut commands = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        match Command::parse(line) {
            Ok(Some(command)) => commands.push((line_no, command)),
            Ok(None) => {}
            Err(err) => return Err(anyhow!("line {line_no}: {err}")),
        }
    }
    Ok(commands)
}

/// Outcome of [`run_script`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptReport {
    pub executed: usize,
    pub errors: usize,
}

/// Executes `commands` against `session`, writing status lines to `out`.
///
/// Store failures do not stop the script; they are counted in the report.
pub fn run_script<S, T, W>(
    session: &mut Session<S, T>,
    commands: &[(usize, Command)],
    stats: Option<&Rc<RefCell<Statistics>>>,
    out: &mut W,
) -> Result<ScriptReport>
where
    S: Surface,
    T: SnapshotStore,
    W: Write,
{
    let mut report = ScriptReport::default();

    for (line_no, command) in commands {
        log::debug!("line {}: {:?}", line_no, command);
        let status = match command {
            Command::Shape(kind) => {
                session.set_tool(*kind);
                None
            }
            Command::Color(color) => {
                session.set_color(*color);
                None
            }
            Command::Fill(filled) => {
                session.set_fill_mode(*filled);
                None
            }
            Command::Draw { x1, y1, x2, y2 } => {
                session.draw(*x1, *y1, *x2, *y2);
                None
            }
            Command::Undo => Some(match session.undo() {
                Some(shape) => StatusMessage::info(format!("Undo: {}", shape.kind)),
                None => StatusMessage::warning("Nothing to undo"),
            }),
            Command::Redo => Some(match session.redo() {
                Some(shape) => StatusMessage::info(format!("Redo: {}", shape.kind)),
                None => StatusMessage::warning("Nothing to redo"),
            }),
            Command::Clear => {
                session.new_drawing();
                None
            }
            Command::Save(name) => Some(session.save(name)),
            Command::Load(name) => Some(session.load(name)),
            Command::Delete(name) => Some(session.delete(name)),
            Command::List => {
                match session.list() {
                    Ok(names) => {
                        for name in names {
                            writeln!(out, "{name}")?;
                        }
                    }
                    Err(err) => {
                        log::error!("Failed to list drawings: {}", err);
                        report.errors += 1;
                        writeln!(out, "error: {err}")?;
                    }
                }
                None
            }
            Command::Stats => {
                match stats {
                    Some(stats) => write!(out, "{}", stats.borrow().summary())?,
                    None => writeln!(out, "Statistics are not being collected")?,
                }
                None
            }
        };

        if let Some(status) = status {
            let prefix = match status.level {
                StatusLevel::Info => "",
                StatusLevel::Warning => "warning: ",
                StatusLevel::Error => {
                    report.errors += 1;
                    "error: "
                }
            };
            writeln!(out, "{prefix}{status}")?;
        }
        report.executed += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Frame, RED};
    use crate::events::NotificationBus;
    use crate::store::MemoryStore;

    fn session_with_stats() -> (Session<Frame, MemoryStore>, Rc<RefCell<Statistics>>) {
        let bus = Rc::new(NotificationBus::new());
        let stats = Rc::new(RefCell::new(Statistics::new()));
        bus.subscribe(stats.clone());
        (Session::new(Frame::new(), MemoryStore::new(), bus), stats)
    }

    #[test]
    fn parses_every_command() {
        assert_eq!(Command::parse("  # note"), Ok(None));
        assert_eq!(Command::parse(""), Ok(None));
        assert_eq!(
            Command::parse("shape Rect"),
            Ok(Some(Command::Shape(ShapeKind::Rectangle)))
        );
        assert_eq!(Command::parse("color red"), Ok(Some(Command::Color(RED))));
        assert_eq!(
            Command::parse("color #00FF00"),
            Ok(Some(Command::Color(Color::new(0, 255, 0))))
        );
        assert_eq!(Command::parse("fill on"), Ok(Some(Command::Fill(true))));
        assert_eq!(
            Command::parse("draw 1 2.5 -3 4"),
            Ok(Some(Command::Draw {
                x1: 1.0,
                y1: 2.5,
                x2: -3.0,
                y2: 4.0
            }))
        );
        assert_eq!(
            Command::parse("save My Sketch"),
            Ok(Some(Command::Save("My Sketch".to_string())))
        );
        assert_eq!(Command::parse("UNDO"), Ok(Some(Command::Undo)));
        assert_eq!(Command::parse("stats"), Ok(Some(Command::Stats)));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(Command::parse("draw 1 2 3").is_err());
        assert!(Command::parse("draw 1 2 3 nan").is_err());
        assert!(Command::parse("shape triangle").is_err());
        assert!(Command::parse("color chartreuse-ish").is_err());
        assert!(Command::parse("fill maybe").is_err());
        assert!(Command::parse("save").is_err());
        assert!(Command::parse("paint 1 2").is_err());
    }

    #[test]
    fn parse_script_reports_line_numbers() {
        let err = parse_script("draw 0 0 1 1\n\nbogus\n").unwrap_err();
        assert_eq!(err.to_string(), "line 3: Unknown command 'bogus'");
    }

    #[test]
    fn runs_a_script_end_to_end() {
        let (mut session, stats) = session_with_stats();
        let commands = parse_script(
            "shape rectangle\nfill on\ndraw 0 0 10 10\ndraw 5 5 20 20\nundo\nsave pic\nclear\nload pic\nstats\n",
        )
        .unwrap();
        let mut out = Vec::new();

        let report = run_script(&mut session, &commands, Some(&stats), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            report,
            ScriptReport {
                executed: 9,
                errors: 0
            }
        );
        assert_eq!(session.history().applied_len(), 1);
        assert!(session.history().surface().shapes[0].filled);
        assert!(text.contains("Undo: Rectangle"));
        assert!(text.contains("Drawing 'pic' saved (1 shapes)"));
        assert!(text.contains("Drawing 'pic' loaded (1 shapes)"));
        assert!(text.contains("Total shapes drawn: 3"));
    }

    #[test]
    fn warnings_are_not_errors() {
        let (mut session, _) = session_with_stats();
        let commands = parse_script("undo\nredo\nload missing\n").unwrap();
        let mut out = Vec::new();

        let report = run_script(&mut session, &commands, None, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(report.errors, 0);
        assert!(text.contains("warning: Nothing to undo"));
        assert!(text.contains("warning: Drawing 'missing' not found"));
    }

    #[test]
    fn list_prints_most_recent_first() {
        let (mut session, _) = session_with_stats();
        let commands = parse_script("save b\nsave a\nlist\n").unwrap();
        let mut out = Vec::new();

        run_script(&mut session, &commands, None, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.ends_with("a\nb\n"));
    }
}
