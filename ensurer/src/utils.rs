use std::{
  fs::{File, OpenOptions},
  io::{BufReader, Write},
  os::unix::fs::OpenOptionsExt,
  path::Path,
};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};

/// Serialization format of a manifest or configuration file
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
  Json,
  Yaml,
}

impl Format {
  /// JSON for `.json` files, YAML for everything else
  pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
    match path.as_ref().extension().and_then(|ext| ext.to_str()) {
      Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
      _ => Format::Yaml,
    }
  }
}

/// Read and deserialize a document, returning the format it was read as
pub fn read_document<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<(T, Format)> {
  let path = path.as_ref();
  let format = Format::from_path(path);
  let file = File::open(path).with_context(|| format!("Unable to open {}", path.display()))?;
  let reader = BufReader::new(file);

  let document = match format {
    Format::Json => serde_json::from_reader(reader).with_context(|| format!("Invalid JSON in {}", path.display()))?,
    Format::Yaml => serde_yaml::from_reader(reader).with_context(|| format!("Invalid YAML in {}", path.display()))?,
  };

  Ok((document, format))
}

/// Serialize a document back into the format it was read as
pub fn render_document<T: Serialize>(document: &T, format: Format) -> Result<String> {
  let rendered = match format {
    Format::Json => serde_json::to_string_pretty(document)? + "\n",
    Format::Yaml => serde_yaml::to_string(document)?,
  };

  Ok(rendered)
}

/// Write the result to `path`, or to stdout when there is no path
pub fn write_output<P: AsRef<Path>>(contents: &str, path: Option<P>) -> Result<()> {
  match path {
    Some(path) => write_file(contents.as_bytes(), path, Some(0o644)),
    None => {
      let mut stdout = std::io::stdout().lock();
      stdout.write_all(contents.as_bytes())?;
      Ok(stdout.flush()?)
    }
  }
}

/// Write a file to disk, setting the file mode
pub fn write_file<P: AsRef<Path>>(contents: &[u8], path: P, mode: Option<u32>) -> Result<()> {
  let mut file = OpenOptions::new()
    .write(true)
    .create(true)
    .truncate(true)
    .mode(mode.unwrap_or(0o644))
    .open(&path)
    .with_context(|| format!("Unable to write {}", path.as_ref().display()))?;
  file.write_all(contents)?;

  Ok(())
}
