//! Plain-text input scripts for headless runs.
//!
//! Each line reads `<frames> [edge ...]`: the edges are delivered as one input
//! batch, then `frames` ticks are simulated. An edge is `+name` for a press or
//! `-name` for a release. Blank lines and lines starting with `#` are skipped.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use bryte_system_input::{InputBatch, Key, MouseButton};
use tracing::warn;

/// One line of a script.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ScriptStep {
    /// Edges delivered before the first tick.
    pub(crate) batch: InputBatch,
    /// Ticks simulated after the edges.
    pub(crate) frames: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Control {
    Key(Key),
    Mouse(MouseButton),
}

/// Reads and parses a script file.
pub(crate) fn load(path: &Path) -> Result<Vec<ScriptStep>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    parse(&contents).with_context(|| format!("failed to parse script {}", path.display()))
}

/// Parses script contents.
pub(crate) fn parse(contents: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let step = parse_line(line).with_context(|| format!("line {}", index + 1))?;
        steps.push(step);
    }
    Ok(steps)
}

fn parse_line(line: &str) -> Result<ScriptStep> {
    let mut tokens = line.split_whitespace();
    let frames = tokens.next().unwrap_or_default();
    let frames = frames
        .parse::<u32>()
        .with_context(|| format!("expected a frame count, found '{frames}'"))?;

    let mut step = ScriptStep {
        frames,
        ..ScriptStep::default()
    };
    for token in tokens {
        let (down, name) = if let Some(name) = token.strip_prefix('+') {
            (true, name)
        } else if let Some(name) = token.strip_prefix('-') {
            (false, name)
        } else {
            bail!("edge '{token}' must start with '+' or '-'");
        };
        let accepted = match control(name)? {
            Control::Key(key) => step.batch.add_key_change(key, down),
            Control::Mouse(button) => step.batch.add_mouse_button_change(button, down),
        };
        if !accepted {
            warn!(edge = token, "input batch full, edge dropped");
        }
    }
    Ok(step)
}

fn control(name: &str) -> Result<Control> {
    let control = match name {
        "w" => Control::Key(Key::W),
        "a" => Control::Key(Key::A),
        "s" => Control::Key(Key::S),
        "d" => Control::Key(Key::D),
        "space" => Control::Key(Key::Space),
        "e" => Control::Key(Key::E),
        "q" => Control::Key(Key::Q),
        "b" => Control::Key(Key::B),
        "shift" => Control::Key(Key::Shift),
        "8" => Control::Key(Key::Digit8),
        "k" => Control::Key(Key::K),
        "i" => Control::Key(Key::I),
        "mouse_left" => Control::Mouse(MouseButton::Left),
        "mouse_right" => Control::Mouse(MouseButton::Right),
        "mouse_middle" => Control::Mouse(MouseButton::Middle),
        other => bail!("unknown control '{other}'"),
    };
    Ok(control)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bryte_system_input::{KeyChange, MouseButtonChange};

    #[test]
    fn parses_edges_and_frame_counts() {
        let steps = parse(
            "# walk right, then swing\n\
             30 +d\n\
             \n\
             1 -d +space -space +mouse_right\n",
        )
        .expect("script parses");

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].frames, 30);
        assert_eq!(
            steps[0].batch.key_changes(),
            &[KeyChange {
                key: Key::D,
                down: true
            }]
        );
        assert_eq!(steps[1].batch.key_changes().len(), 3);
        assert_eq!(
            steps[1].batch.mouse_button_changes(),
            &[MouseButtonChange {
                button: MouseButton::Right,
                down: true
            }]
        );
    }

    #[test]
    fn edges_beyond_the_batch_limit_are_dropped() {
        let steps = parse("1 +w -w +w -w +w -w +w -w +w -w").expect("script parses");
        assert_eq!(steps[0].batch.key_changes().len(), 8);
    }

    #[test]
    fn bundled_demo_script_parses() {
        let steps = parse(include_str!("../../../demos/opening.script")).expect("demo parses");
        assert_eq!(steps.len(), 8);
        assert!(steps.iter().all(|step| step.frames > 0));
    }

    #[test]
    fn malformed_lines_name_the_line() {
        let error = parse("10 +d\nten +d\n").expect_err("frame count is not a number");
        assert!(format!("{error:#}").contains("line 2"));

        assert!(parse("1 d").is_err());
        assert!(parse("1 +jump").is_err());
    }
}
