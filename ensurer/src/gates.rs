use std::collections::BTreeMap;

/// Feature gates of a component, keyed by gate name
pub type FeatureGates = BTreeMap<String, bool>;

/// Sets `name` to `value`, creating the map first if there is none
///
/// Gates not named are left as they are.
pub fn ensure_feature_gate(gates: &mut Option<FeatureGates>, name: &str, value: bool) {
  gates.get_or_insert_with(FeatureGates::new).insert(name.to_owned(), value);
}
