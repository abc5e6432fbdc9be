use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::debug;

use crate::{ensurer, kubelet::KubeletConfiguration, utils, StaticCluster};

#[derive(Args, Debug)]
pub struct KubeletConfig {
  /// Kubelet configuration file (YAML, or JSON with a `.json` extension)
  #[arg(short, long)]
  pub file: PathBuf,

  /// Kubernetes version of the cluster (i.e. - 1.15.5 or v1.15.5)
  #[arg(long, env = "KUBERNETES_VERSION")]
  pub kubernetes_version: Option<String>,

  /// Write the mutated configuration to this file instead of stdout
  #[arg(short, long)]
  pub output: Option<PathBuf>,
}

impl KubeletConfig {
  pub fn ensure(&self) -> Result<()> {
    let (mut config, format): (KubeletConfiguration, _) = utils::read_document(&self.file)?;
    debug!("Read kubelet configuration from {}", self.file.display());

    let cluster = StaticCluster::new(self.kubernetes_version.clone());
    ensurer::ensure_kubelet_configuration(&cluster, &mut config)?;

    let rendered = utils::render_document(&config, format)?;
    utils::write_output(&rendered, self.output.as_ref())
  }
}
