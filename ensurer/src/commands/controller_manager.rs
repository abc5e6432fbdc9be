use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::debug;

use crate::{ensurer, kube::Deployment, utils};

#[derive(Args, Debug)]
pub struct ControllerManager {
  /// Deployment manifest of the kube-controller-manager (YAML, or JSON with a `.json` extension)
  #[arg(short, long)]
  pub file: PathBuf,

  /// Write the mutated manifest to this file instead of stdout
  #[arg(short, long)]
  pub output: Option<PathBuf>,
}

impl ControllerManager {
  pub fn ensure(&self) -> Result<()> {
    let (mut deployment, format): (Deployment, _) = utils::read_document(&self.file)?;
    debug!("Read kube-controller-manager deployment from {}", self.file.display());

    ensurer::ensure_kube_controller_manager_deployment(&mut deployment);

    let rendered = utils::render_document(&deployment, format)?;
    utils::write_output(&rendered, self.output.as_ref())
  }
}
