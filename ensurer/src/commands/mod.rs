pub mod apiserver;
pub mod controller_manager;
pub mod kubelet_config;
pub mod kubelet_unit;
