//! Mutates the configuration of control plane components and the kubelet so that
//! they conform to the cloud provider requirements for a given Kubernetes version
//!
//! The mutations themselves ([`ensurer`], [`policy`] and the primitives below them)
//! perform no I/O; the CLI in [`commands`] reads and writes the documents.

pub mod args;
pub mod cli;
pub mod commands;
pub mod ensurer;
pub mod error;
pub mod gates;
pub mod kube;
pub mod kubelet;
pub mod policy;
pub mod unit;
pub mod utils;
pub mod version;

pub use cli::{Cli, Commands};
pub use ensurer::{ClusterContext, StaticCluster};
pub use error::{Error, Result};
