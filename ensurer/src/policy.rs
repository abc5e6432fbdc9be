//! Provider requirements for the control plane and kubelet
//!
//! Every requirement is a row in a decision table: a version [`Predicate`] and the
//! change it triggers. Rows are applied in order and each one is idempotent.

use semver::Version;

use crate::{
  args::CommandLine,
  gates::{self, FeatureGates},
  version::{Predicate, V14, V16},
};

pub const ENABLE_ADMISSION_PLUGINS: &str = "--enable-admission-plugins=";
pub const DISABLE_ADMISSION_PLUGINS: &str = "--disable-admission-plugins=";
pub const FEATURE_GATES: &str = "--feature-gates=";
pub const CLOUD_PROVIDER: &str = "--cloud-provider=";
pub const PROVIDER_ID: &str = "--provider-id=";
pub const ENABLE_CONTROLLER_ATTACH_DETACH: &str = "--enable-controller-attach-detach=";

const SEP: &str = ",";

/// A single change to a command line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgAction {
  /// `{prefix}{value}` is the only argument with `prefix`
  Set { prefix: &'static str, value: &'static str },

  /// No argument has `prefix`
  Unset { prefix: &'static str },

  /// `value` is one of the comma separated values of the flag
  Contains { prefix: &'static str, value: &'static str },

  /// `value` is not one of the comma separated values of the flag
  NotContains { prefix: &'static str, value: &'static str },
}

impl ArgAction {
  pub fn apply(&self, command: &mut CommandLine) {
    match *self {
      ArgAction::Set { prefix, value } => command.ensure_string_with_prefix(prefix, value),
      ArgAction::Unset { prefix } => command.ensure_no_string_with_prefix(prefix),
      ArgAction::Contains { prefix, value } => command.ensure_string_with_prefix_contains(prefix, value, SEP),
      ArgAction::NotContains { prefix, value } => command.ensure_no_string_with_prefix_contains(prefix, value, SEP),
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgRule {
  pub when: Predicate,
  pub action: ArgAction,
}

impl ArgRule {
  fn new(when: Predicate, action: ArgAction) -> Self {
    ArgRule { when, action }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateRule {
  pub when: Predicate,
  pub gate: &'static str,
  pub value: bool,
}

/// Controller manager: cloud controllers run out of tree
pub const KUBE_CONTROLLER_MANAGER_ARGS: &[ArgAction] = &[ArgAction::Set {
  prefix: CLOUD_PROVIDER,
  value: "external",
}];

/// Kubelet: the provider id is substituted by the unit's environment at start
pub const KUBELET_ARGS: &[ArgAction] = &[
  ArgAction::Set {
    prefix: PROVIDER_ID,
    value: "${PROVIDER_ID}",
  },
  ArgAction::Set {
    prefix: CLOUD_PROVIDER,
    value: "external",
  },
  ArgAction::Set {
    prefix: ENABLE_CONTROLLER_ATTACH_DETACH,
    value: "true",
  },
];

/// API server: volume labels come from the CSI driver and the CSI gates are never turned off
pub fn kube_apiserver_rules() -> Vec<ArgRule> {
  let below_14 = Predicate::Below(V14);
  let from_14_to_16 = Predicate::Between(V14, V16);

  let not_contains = |prefix, value| ArgRule::new(Predicate::Always, ArgAction::NotContains { prefix, value });
  let contains = |when, prefix, value| ArgRule::new(when, ArgAction::Contains { prefix, value });

  vec![
    not_contains(ENABLE_ADMISSION_PLUGINS, "PersistentVolumeLabel"),
    contains(Predicate::Always, DISABLE_ADMISSION_PLUGINS, "PersistentVolumeLabel"),
    not_contains(FEATURE_GATES, "ExpandInUsePersistentVolumes=false"),
    not_contains(FEATURE_GATES, "ExpandCSIVolumes=false"),
    not_contains(FEATURE_GATES, "CSINodeInfo=false"),
    not_contains(FEATURE_GATES, "CSIDriverRegistry=false"),
    contains(below_14.clone(), FEATURE_GATES, "CSINodeInfo=true"),
    contains(below_14, FEATURE_GATES, "CSIDriverRegistry=true"),
    contains(from_14_to_16.clone(), FEATURE_GATES, "ExpandCSIVolumes=true"),
    contains(from_14_to_16, FEATURE_GATES, "ExpandInUsePersistentVolumes=true"),
  ]
}

/// Kubelet configuration feature gates
///
/// Unlike the API server, 1.14 and 1.15 only get `ExpandCSIVolumes`; the
/// kubelet is left with its default for `ExpandInUsePersistentVolumes`.
pub fn kubelet_feature_gate_rules() -> Vec<GateRule> {
  vec![
    GateRule {
      when: Predicate::Below(V14),
      gate: "CSINodeInfo",
      value: true,
    },
    GateRule {
      when: Predicate::Below(V14),
      gate: "CSIDriverRegistry",
      value: true,
    },
    GateRule {
      when: Predicate::Between(V14, V16),
      gate: "ExpandCSIVolumes",
      value: true,
    },
  ]
}

pub fn apply_arg_rules(command: &mut CommandLine, rules: &[ArgRule], ver: &Version) {
  rules
    .iter()
    .filter(|rule| rule.when.holds(ver))
    .for_each(|rule| rule.action.apply(command));
}

pub fn apply_arg_actions(command: &mut CommandLine, actions: &[ArgAction]) {
  actions.iter().for_each(|action| action.apply(command));
}

pub fn ensure_kube_apiserver_command_line_args(command: &mut CommandLine, ver: &Version) {
  apply_arg_rules(command, &kube_apiserver_rules(), ver);
}

pub fn ensure_kube_controller_manager_command_line_args(command: &mut CommandLine) {
  apply_arg_actions(command, KUBE_CONTROLLER_MANAGER_ARGS);
}

pub fn ensure_kubelet_command_line_args(command: &mut CommandLine) {
  apply_arg_actions(command, KUBELET_ARGS);
}

/// Applies the kubelet gate table, creating the gate map if there is none
pub fn ensure_kubelet_feature_gates(feature_gates: &mut Option<FeatureGates>, ver: &Version) {
  feature_gates.get_or_insert_with(FeatureGates::new);

  for rule in kubelet_feature_gate_rules().iter().filter(|rule| rule.when.holds(ver)) {
    gates::ensure_feature_gate(feature_gates, rule.gate, rule.value);
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use rstest::*;

  use super::*;

  fn cmd(args: &[&str]) -> CommandLine {
    CommandLine::new(args.iter().map(|a| a.to_string()).collect())
  }

  fn gate_set(command: &CommandLine) -> BTreeSet<String> {
    command
      .value(FEATURE_GATES)
      .unwrap_or_default()
      .split(',')
      .filter(|v| !v.is_empty())
      .map(ToOwned::to_owned)
      .collect()
  }

  fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
  }

  #[rstest]
  #[case("1.13.0", &["CSINodeInfo=true", "CSIDriverRegistry=true"])]
  #[case("1.14.0", &["ExpandCSIVolumes=true", "ExpandInUsePersistentVolumes=true"])]
  #[case("1.15.5", &["ExpandCSIVolumes=true", "ExpandInUsePersistentVolumes=true"])]
  #[case("1.16.0", &[])]
  #[case("1.17.2", &[])]
  fn it_selects_apiserver_feature_gates(#[case] ver: &str, #[case] expected: &[&str]) {
    let ver = Version::parse(ver).unwrap();
    let mut command = cmd(&["/hyperkube", "kube-apiserver"]);
    ensure_kube_apiserver_command_line_args(&mut command, &ver);

    assert_eq!(gate_set(&command), set(expected));
    assert_eq!(command.value(ENABLE_ADMISSION_PLUGINS), None);
    assert_eq!(command.value(DISABLE_ADMISSION_PLUGINS), Some("PersistentVolumeLabel"));
  }

  #[test]
  fn it_ensures_apiserver_args() {
    let ver = Version::parse("1.13.0").unwrap();
    let mut command = cmd(&[
      "--enable-admission-plugins=Foo,PersistentVolumeLabel",
      "--feature-gates=CSINodeInfo=false",
    ]);
    ensure_kube_apiserver_command_line_args(&mut command, &ver);

    assert_eq!(command.value(ENABLE_ADMISSION_PLUGINS), Some("Foo"));
    assert_eq!(command.value(DISABLE_ADMISSION_PLUGINS), Some("PersistentVolumeLabel"));
    assert_eq!(gate_set(&command), set(&["CSINodeInfo=true", "CSIDriverRegistry=true"]));
    assert_eq!(command.as_slice().len(), 3);
  }

  #[test]
  fn it_strips_disabled_csi_gates_for_any_version() {
    let ver = Version::parse("1.17.2").unwrap();
    let mut command = cmd(&[
      "--feature-gates=ExpandInUsePersistentVolumes=false,Foo=true,ExpandCSIVolumes=false,CSINodeInfo=false,CSIDriverRegistry=false",
    ]);
    ensure_kube_apiserver_command_line_args(&mut command, &ver);

    assert_eq!(command, cmd(&["--feature-gates=Foo=true", "--disable-admission-plugins=PersistentVolumeLabel"]));
  }

  #[rstest]
  #[case("1.13.0")]
  #[case("1.15.5")]
  #[case("1.17.2")]
  fn it_ensures_apiserver_args_idempotently(#[case] ver: &str) {
    let ver = Version::parse(ver).unwrap();
    let mut command = cmd(&[
      "--enable-admission-plugins=Foo,PersistentVolumeLabel",
      "--feature-gates=CSINodeInfo=false,Bar=true",
    ]);
    ensure_kube_apiserver_command_line_args(&mut command, &ver);
    let once = command.clone();
    ensure_kube_apiserver_command_line_args(&mut command, &ver);

    assert_eq!(command, once);
  }

  #[rstest]
  #[case(&[], &["--cloud-provider=external"])]
  #[case(
    &["/hyperkube", "kube-controller-manager", "--cloud-provider=alicloud", "--v=2"],
    &["/hyperkube", "kube-controller-manager", "--cloud-provider=external", "--v=2"]
  )]
  fn it_ensures_controller_manager_args(#[case] input: &[&str], #[case] expected: &[&str]) {
    let mut command = cmd(input);
    ensure_kube_controller_manager_command_line_args(&mut command);
    assert_eq!(command, cmd(expected));
  }

  #[rstest]
  #[case(ArgAction::Unset { prefix: CLOUD_PROVIDER }, &["--v=2"])]
  #[case(
    ArgAction::Set { prefix: CLOUD_PROVIDER, value: "external" },
    &["--cloud-provider=external", "--v=2"]
  )]
  #[case(
    ArgAction::Contains { prefix: FEATURE_GATES, value: "Foo=true" },
    &["--cloud-provider=aws", "--v=2", "--feature-gates=Foo=true"]
  )]
  fn it_applies_arg_actions(#[case] action: ArgAction, #[case] expected: &[&str]) {
    let mut command = cmd(&["--cloud-provider=aws", "--v=2"]);
    apply_arg_actions(&mut command, &[action, action]);
    assert_eq!(command, cmd(expected));
  }

  #[test]
  fn it_ensures_kubelet_args() {
    let mut command = cmd(&["/opt/bin/kubelet", "--cloud-provider=alicloud", "--v=2"]);
    ensure_kubelet_command_line_args(&mut command);

    assert_eq!(
      command,
      cmd(&[
        "/opt/bin/kubelet",
        "--cloud-provider=external",
        "--v=2",
        "--provider-id=${PROVIDER_ID}",
        "--enable-controller-attach-detach=true",
      ])
    );
  }

  #[rstest]
  #[case("1.13.0", &["CSINodeInfo", "CSIDriverRegistry"])]
  #[case("1.14.0", &["ExpandCSIVolumes"])]
  #[case("1.15.5", &["ExpandCSIVolumes"])]
  #[case("1.16.0", &[])]
  #[case("1.16.1", &[])]
  #[case("1.17.2", &[])]
  fn it_selects_kubelet_feature_gates(#[case] ver: &str, #[case] expected: &[&str]) {
    let ver = Version::parse(ver).unwrap();
    let mut gates = Some(FeatureGates::new());
    ensure_kubelet_feature_gates(&mut gates, &ver);

    let expected: FeatureGates = expected.iter().map(|g| (g.to_string(), true)).collect();
    assert_eq!(gates, Some(expected));
  }

  #[test]
  fn it_creates_kubelet_feature_gates() {
    let ver = Version::parse("1.17.2").unwrap();
    let mut gates = None;
    ensure_kubelet_feature_gates(&mut gates, &ver);

    assert_eq!(gates, Some(FeatureGates::new()));
  }
}
