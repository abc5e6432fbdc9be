use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::gates::FeatureGates;

/// KubeletConfiguration contains the configuration for the Kubelet
///
/// Only the feature gates are touched; every other field is kept as read.
///
/// https://kubernetes.io/docs/reference/config-api/kubelet-config.v1beta1/
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubeletConfiguration {
  /// Kind is a string value representing the REST resource this object represents.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub kind: Option<String>,

  /// APIVersion defines the versioned schema of this representation of an object.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub api_version: Option<String>,

  /// featureGates is a map of feature names to bools that enable or disable experimental
  /// features. This field modifies piecemeal the built-in default values from
  /// "k8s.io/kubernetes/pkg/features/kube_features.go".
  #[serde(skip_serializing_if = "Option::is_none")]
  pub feature_gates: Option<FeatureGates>,

  #[serde(flatten)]
  pub other: BTreeMap<String, JsonValue>,
}
