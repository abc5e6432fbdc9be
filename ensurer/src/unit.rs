use anyhow::{anyhow, bail, Result};

/// Separator used when rewriting a kubelet `ExecStart`, one flag per line
pub const EXEC_START_SEPARATOR: &str = " \\\n    ";

/// A single `Name=Value` entry of a systemd unit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitOption {
  pub section: String,
  pub name: String,
  pub value: String,
}

impl UnitOption {
  pub fn new(section: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
    UnitOption {
      section: section.into(),
      name: name.into(),
      value: value.into(),
    }
  }
}

/// Options named `name` within `section`, in file order
pub fn unit_options_with_section_and_name_mut<'a>(
  options: &'a mut [UnitOption],
  section: &'a str,
  name: &'a str,
) -> impl Iterator<Item = &'a mut UnitOption> {
  options
    .iter_mut()
    .filter(move |opt| opt.section == section && opt.name == name)
}

/// Split a command line, such as the value of `ExecStart`, into its arguments
///
/// Backslash-newline continuations are treated as whitespace.
pub fn deserialize_command_line(raw: &str) -> Vec<String> {
  raw
    .replace("\\\r\n", " ")
    .replace("\\\n", " ")
    .split_whitespace()
    .map(ToOwned::to_owned)
    .collect()
}

/// Join arguments back into a single command line
///
/// The first `n` arguments share the first line, separated by a space, and every
/// remaining argument is preceded by `sep`.
pub fn serialize_command_line(command: &[String], n: usize, sep: &str) -> String {
  if command.len() <= n {
    return command.join(" ");
  }

  let (head, tail) = command.split_at(n);
  let mut line = head.join(" ");
  for arg in tail {
    line.push_str(sep);
    line.push_str(arg);
  }
  line
}

/// Parse the contents of a systemd unit file into its options
///
/// Comments and blank lines are dropped. Values continued over several lines keep
/// their trailing backslash and newline so the command line layout survives.
pub fn parse_unit_file(contents: &str) -> Result<Vec<UnitOption>> {
  let mut options = Vec::new();
  let mut section: Option<String> = None;
  let mut lines = contents.lines();

  while let Some(line) = lines.next() {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
      continue;
    }

    if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
      section = Some(name.trim().to_owned());
      continue;
    }

    let Some(section) = &section else {
      bail!("Option outside of a section: {line}");
    };
    let (name, value) = line
      .split_once('=')
      .ok_or_else(|| anyhow!("Expected <name>=<value> in section [{section}]: {line}"))?;

    let mut value = value.trim_start().to_owned();
    while value.ends_with('\\') {
      match lines.next() {
        Some(next) => {
          value.push('\n');
          value.push_str(next.trim_end());
        }
        None => break,
      }
    }

    options.push(UnitOption::new(section.as_str(), name.trim_end(), value));
  }

  Ok(options)
}

/// Render unit options back into unit file contents
pub fn render_unit_file(options: &[UnitOption]) -> String {
  let mut contents = String::new();
  let mut current: Option<&str> = None;

  for opt in options {
    if current != Some(opt.section.as_str()) {
      if current.is_some() {
        contents.push('\n');
      }
      contents.push_str(&format!("[{}]\n", opt.section));
      current = Some(&opt.section);
    }
    contents.push_str(&format!("{}={}\n", opt.name, opt.value));
  }

  contents
}
