/// Ordered command line arguments of a process
///
/// Flags are addressed by prefix (e.g. `--feature-gates=`) rather than by position.
/// Arguments that are not addressed keep their relative order and new flags
/// are appended at the end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandLine {
  args: Vec<String>,
}

impl CommandLine {
  pub fn new(args: Vec<String>) -> Self {
    Self { args }
  }

  pub fn as_slice(&self) -> &[String] {
    &self.args
  }

  pub fn into_inner(self) -> Vec<String> {
    self.args
  }

  /// Value of the first argument starting with `prefix`
  pub fn value(&self, prefix: &str) -> Option<&str> {
    self.args.iter().find_map(|arg| arg.strip_prefix(prefix))
  }

  /// Ensures exactly one argument `{prefix}{value}` is present
  ///
  /// The first argument with `prefix` is rewritten in place and any later
  /// arguments sharing the prefix are dropped. Appended when no argument matches.
  pub fn ensure_string_with_prefix(&mut self, prefix: &str, value: &str) {
    let mut found = false;
    self.args.retain_mut(|arg| {
      if !arg.starts_with(prefix) {
        return true;
      }
      if found {
        return false;
      }
      found = true;
      *arg = format!("{prefix}{value}");
      true
    });

    if !found {
      self.args.push(format!("{prefix}{value}"));
    }
  }

  /// Ensures no argument starts with `prefix`
  pub fn ensure_no_string_with_prefix(&mut self, prefix: &str) {
    self.args.retain(|arg| !arg.starts_with(prefix));
  }

  /// Ensures `value` is one of the `sep` delimited values of the flag with `prefix`
  ///
  /// The flag is created with `value` as its only entry when it does not exist.
  pub fn ensure_string_with_prefix_contains(&mut self, prefix: &str, value: &str, sep: &str) {
    match self.args.iter_mut().find(|arg| arg.starts_with(prefix)) {
      Some(arg) => {
        let mut values = MultiValue::parse(&arg[prefix.len()..], sep);
        if values.insert(value) {
          *arg = format!("{prefix}{}", values.join(sep));
        }
      }
      None => self.args.push(format!("{prefix}{value}")),
    }
  }

  /// Ensures `value` is not one of the `sep` delimited values of the flag with `prefix`
  ///
  /// A flag left without values is kept as the bare `prefix`.
  pub fn ensure_no_string_with_prefix_contains(&mut self, prefix: &str, value: &str, sep: &str) {
    if let Some(arg) = self.args.iter_mut().find(|arg| arg.starts_with(prefix)) {
      let mut values = MultiValue::parse(&arg[prefix.len()..], sep);
      if values.remove(value) {
        *arg = format!("{prefix}{}", values.join(sep));
      }
    }
  }
}

impl From<Vec<String>> for CommandLine {
  fn from(args: Vec<String>) -> Self {
    Self::new(args)
  }
}

impl From<CommandLine> for Vec<String> {
  fn from(command: CommandLine) -> Self {
    command.into_inner()
  }
}

/// Values of a multi-value flag such as `--feature-gates=A=true,B=false`
///
/// Insertion ordered, never sorted. Empty entries are discarded on parse.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultiValue {
  values: Vec<String>,
}

impl MultiValue {
  pub fn parse(raw: &str, sep: &str) -> Self {
    let values = raw
      .split(sep)
      .filter(|v| !v.is_empty())
      .map(ToOwned::to_owned)
      .collect();

    Self { values }
  }

  pub fn contains(&self, value: &str) -> bool {
    self.values.iter().any(|v| v == value)
  }

  /// Appends `value` when absent, returning whether it was added
  pub fn insert(&mut self, value: &str) -> bool {
    if self.contains(value) {
      return false;
    }
    self.values.push(value.to_owned());
    true
  }

  /// Removes every occurrence of `value`, returning whether any was present
  pub fn remove(&mut self, value: &str) -> bool {
    let before = self.values.len();
    self.values.retain(|v| v != value);
    self.values.len() != before
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.values.iter().map(String::as_str)
  }

  pub fn join(&self, sep: &str) -> String {
    self.values.join(sep)
  }
}
