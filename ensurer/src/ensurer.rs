use std::mem;

use anyhow::anyhow;
use tracing::{debug, info};

use crate::{
  args::CommandLine,
  error::Result,
  gates::FeatureGates,
  kube::{Container, Deployment},
  kubelet::KubeletConfiguration,
  policy,
  unit::{self, UnitOption, EXEC_START_SEPARATOR},
  version,
};

pub const KUBE_APISERVER: &str = "kube-apiserver";
pub const KUBE_CONTROLLER_MANAGER: &str = "kube-controller-manager";

/// Access to the cluster a resource belongs to
pub trait ClusterContext {
  /// Kubernetes version the cluster runs (e.g. `1.15.5`)
  fn kubernetes_version(&self) -> anyhow::Result<String>;
}

/// Cluster context for a cluster whose version is known up front
#[derive(Clone, Debug, Default)]
pub struct StaticCluster {
  version: Option<String>,
}

impl StaticCluster {
  pub fn new(version: Option<String>) -> Self {
    Self { version }
  }
}

impl ClusterContext for StaticCluster {
  fn kubernetes_version(&self) -> anyhow::Result<String> {
    self
      .version
      .clone()
      .ok_or_else(|| anyhow!("Kubernetes version of the cluster is not known"))
  }
}

/// Ensures the `kube-apiserver` container of the deployment conforms to the provider requirements
///
/// The cluster is only looked up when the deployment has such a container.
pub fn ensure_kube_apiserver_deployment(ctx: &impl ClusterContext, deployment: &mut Deployment) -> Result<()> {
  let Some(container) = deployment.container_mut(KUBE_APISERVER) else {
    debug!("Deployment has no {KUBE_APISERVER} container");
    return Ok(());
  };

  let k8s_version = ctx.kubernetes_version()?;
  ensure_kube_apiserver_container(container, &k8s_version)
}

/// Ensures the `kube-controller-manager` container of the deployment conforms to the provider requirements
pub fn ensure_kube_controller_manager_deployment(deployment: &mut Deployment) {
  match deployment.container_mut(KUBE_CONTROLLER_MANAGER) {
    Some(container) => ensure_kube_controller_manager_container(container),
    None => debug!("Deployment has no {KUBE_CONTROLLER_MANAGER} container"),
  }
}

/// Ensures the kubelet configuration conforms to the provider requirements
pub fn ensure_kubelet_configuration(ctx: &impl ClusterContext, config: &mut KubeletConfiguration) -> Result<()> {
  let k8s_version = ctx.kubernetes_version()?;
  ensure_kubelet_feature_gates(&mut config.feature_gates, &k8s_version)
}

/// Rewrites the command of a `kube-apiserver` container
///
/// The version is parsed before anything is changed, so the container is left
/// as it was when the version is invalid.
pub fn ensure_kube_apiserver_container(container: &mut Container, k8s_version: &str) -> Result<()> {
  let ver = version::parse_version(k8s_version)?;

  let mut command = CommandLine::new(mem::take(&mut container.command));
  policy::ensure_kube_apiserver_command_line_args(&mut command, &ver);
  container.command = command.into_inner();

  info!("Ensured {} command for Kubernetes {ver}", container.name);
  Ok(())
}

/// Rewrites the command of a `kube-controller-manager` container
pub fn ensure_kube_controller_manager_container(container: &mut Container) {
  let mut command = CommandLine::new(mem::take(&mut container.command));
  policy::ensure_kube_controller_manager_command_line_args(&mut command);
  container.command = command.into_inner();

  info!("Ensured {} command", container.name);
}

/// Rewrites the `ExecStart` of the kubelet service, one flag per line
///
/// Empty `ExecStart=` lines only reset the command list and are skipped.
pub fn ensure_kubelet_service_unit_options(mut options: Vec<UnitOption>) -> Vec<UnitOption> {
  let exec_start = unit::unit_options_with_section_and_name_mut(&mut options, "Service", "ExecStart")
    .find(|opt| !opt.value.trim().is_empty());

  match exec_start {
    Some(opt) => {
      let mut command = CommandLine::new(unit::deserialize_command_line(&opt.value));
      policy::ensure_kubelet_command_line_args(&mut command);
      opt.value = unit::serialize_command_line(command.as_slice(), 1, EXEC_START_SEPARATOR);

      info!("Ensured kubelet service ExecStart");
    }
    None => debug!("Kubelet service has no ExecStart"),
  }

  options
}

/// Applies the CSI feature gates for the given version to a kubelet's feature gates
///
/// Nothing is written, not even an empty map, when the version is invalid.
pub fn ensure_kubelet_feature_gates(feature_gates: &mut Option<FeatureGates>, k8s_version: &str) -> Result<()> {
  let ver = version::parse_version(k8s_version)?;
  policy::ensure_kubelet_feature_gates(feature_gates, &ver);

  debug!("Kubelet feature gates for Kubernetes {ver}: {feature_gates:?}");
  Ok(())
}
