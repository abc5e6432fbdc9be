use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use crate::{ensurer, unit, utils};

#[derive(Args, Debug)]
pub struct KubeletUnit {
  /// The kubelet systemd unit file (i.e. - /etc/systemd/system/kubelet.service)
  #[arg(short, long)]
  pub file: PathBuf,

  /// Write the mutated unit to this file instead of stdout
  #[arg(short, long)]
  pub output: Option<PathBuf>,
}

impl KubeletUnit {
  pub fn ensure(&self) -> Result<()> {
    let contents =
      fs::read_to_string(&self.file).with_context(|| format!("Unable to open {}", self.file.display()))?;
    let options = unit::parse_unit_file(&contents)?;
    debug!("Read {} unit options from {}", options.len(), self.file.display());

    let options = ensurer::ensure_kubelet_service_unit_options(options);

    utils::write_output(&unit::render_unit_file(&options), self.output.as_ref())
  }
}
