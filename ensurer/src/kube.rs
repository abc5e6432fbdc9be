use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Deployment of a control plane component
///
/// Only the path down to the containers is modelled, everything else in the
/// manifest is carried through untouched.
///
/// https://kubernetes.io/docs/reference/kubernetes-api/workload-resources/deployment-v1/
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
  /// APIVersion defines the versioned schema of this representation of an object.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub api_version: Option<String>,

  /// Kind is a string value representing the REST resource this object represents.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub kind: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub metadata: Option<JsonValue>,

  /// Specification of the desired behavior of the Deployment.
  #[serde(default, skip_serializing_if = "DeploymentSpec::is_empty")]
  pub spec: DeploymentSpec,

  #[serde(flatten)]
  pub other: BTreeMap<String, JsonValue>,
}

impl Deployment {
  /// Container of the pod template with the given name
  pub fn container_mut(&mut self, name: &str) -> Option<&mut Container> {
    container_with_name_mut(&mut self.spec.template.spec.containers, name)
  }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
  /// Template describes the pods that will be created.
  #[serde(default, skip_serializing_if = "PodTemplateSpec::is_empty")]
  pub template: PodTemplateSpec,

  #[serde(flatten)]
  pub other: BTreeMap<String, JsonValue>,
}

impl DeploymentSpec {
  pub fn is_empty(&self) -> bool {
    self.template.is_empty() && self.other.is_empty()
  }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodTemplateSpec {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub metadata: Option<JsonValue>,

  #[serde(default, skip_serializing_if = "PodSpec::is_empty")]
  pub spec: PodSpec,

  #[serde(flatten)]
  pub other: BTreeMap<String, JsonValue>,
}

impl PodTemplateSpec {
  pub fn is_empty(&self) -> bool {
    self.metadata.is_none() && self.spec.is_empty() && self.other.is_empty()
  }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
  /// List of containers belonging to the pod.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub containers: Vec<Container>,

  #[serde(flatten)]
  pub other: BTreeMap<String, JsonValue>,
}

impl PodSpec {
  pub fn is_empty(&self) -> bool {
    self.containers.is_empty() && self.other.is_empty()
  }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
  /// Name of the container specified as a DNS_LABEL.
  pub name: String,

  /// Entrypoint array. Not executed within a shell.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub command: Vec<String>,

  #[serde(flatten)]
  pub other: BTreeMap<String, JsonValue>,
}

impl Container {
  pub fn new(name: &str, command: Vec<String>) -> Self {
    Container {
      name: name.to_owned(),
      command,
      ..Container::default()
    }
  }
}

/// First container with the given name
pub fn container_with_name_mut<'a>(containers: &'a mut [Container], name: &str) -> Option<&'a mut Container> {
  containers.iter_mut().find(|c| c.name == name)
}

#[cfg(test)]
mod tests {
  use super::*;

  const DEPLOYMENT: &str = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: kube-apiserver
  namespace: shoot--foo--bar
spec:
  replicas: 1
  template:
    metadata:
      labels:
        app: kubernetes
    spec:
      containers:
        - name: kube-apiserver
          image: k8s.gcr.io/hyperkube:v1.15.5
          command:
            - /hyperkube
            - apiserver
            - --enable-admission-plugins=Priority,PersistentVolumeLabel
        - name: vpn-seed
          image: eu.gcr.io/gardener-project/gardener/vpn-seed:0.14.0
      dnsPolicy: ClusterFirst
"#;

  #[test]
  fn it_deserializes_deployments() {
    let mut deployment: Deployment = serde_yaml::from_str(DEPLOYMENT).unwrap();

    assert_eq!(deployment.kind.as_deref(), Some("Deployment"));
    assert_eq!(deployment.spec.other.get("replicas"), Some(&JsonValue::from(1)));
    assert_eq!(
      deployment.spec.template.spec.other.get("dnsPolicy"),
      Some(&JsonValue::from("ClusterFirst"))
    );

    let apiserver = deployment.container_mut("kube-apiserver").unwrap();
    assert_eq!(apiserver.command.len(), 3);
    assert_eq!(
      apiserver.other.get("image"),
      Some(&JsonValue::from("k8s.gcr.io/hyperkube:v1.15.5"))
    );

    let vpn = deployment.container_mut("vpn-seed").unwrap();
    assert!(vpn.command.is_empty());
    assert!(deployment.container_mut("kube-controller-manager").is_none());
  }

  #[test]
  fn it_preserves_unknown_fields() {
    let deployment: Deployment = serde_yaml::from_str(DEPLOYMENT).unwrap();
    let serialized = serde_yaml::to_string(&deployment).unwrap();
    let reparsed: Deployment = serde_yaml::from_str(&serialized).unwrap();

    assert_eq!(reparsed, deployment);
    assert!(!serialized.contains("command: []"));
  }

  #[test]
  fn it_does_not_add_missing_pod_templates() {
    let raw = serde_json::json!({"kind": "Deployment", "metadata": {"name": "x"}});
    let mut deployment: Deployment = serde_json::from_value(raw.clone()).unwrap();
    assert!(deployment.container_mut("kube-apiserver").is_none());

    assert_eq!(serde_json::to_value(&deployment).unwrap(), raw);
  }

  #[test]
  fn it_keeps_partial_pod_templates() {
    let raw = serde_json::json!({"spec": {"replicas": 1, "template": {"metadata": {"labels": {"app": "x"}}}}});
    let deployment: Deployment = serde_json::from_value(raw.clone()).unwrap();

    assert_eq!(serde_json::to_value(&deployment).unwrap(), raw);
  }
}
