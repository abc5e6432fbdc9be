use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::debug;

use crate::{ensurer, kube::Deployment, utils, StaticCluster};

#[derive(Args, Debug)]
pub struct ApiServer {
  /// Deployment manifest of the kube-apiserver (YAML, or JSON with a `.json` extension)
  #[arg(short, long)]
  pub file: PathBuf,

  /// Kubernetes version of the cluster (i.e. - 1.15.5 or v1.15.5)
  #[arg(long, env = "KUBERNETES_VERSION")]
  pub kubernetes_version: Option<String>,

  /// Write the mutated manifest to this file instead of stdout
  #[arg(short, long)]
  pub output: Option<PathBuf>,
}

impl ApiServer {
  pub fn ensure(&self) -> Result<()> {
    let (mut deployment, format): (Deployment, _) = utils::read_document(&self.file)?;
    debug!("Read kube-apiserver deployment from {}", self.file.display());

    let cluster = StaticCluster::new(self.kubernetes_version.clone());
    ensurer::ensure_kube_apiserver_deployment(&cluster, &mut deployment)?;

    let rendered = utils::render_document(&deployment, format)?;
    utils::write_output(&rendered, self.output.as_ref())
  }
}
