use clap::{Parser, Subcommand};
use clap_verbosity_flag::Verbosity;

use crate::commands;

/// Styles for CLI
fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .literal(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::BrightCyan))),
    )
    .usage(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
}

/// Mutates control plane and kubelet configuration to conform to the cloud provider requirements
///
/// The mutated document is written to stdout unless `--output` is given; logs go to stderr.
#[derive(Debug, Parser)]
#[command(author, about, version)]
#[command(propagate_version = true)]
#[command(styles=get_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Disable colored log output
  #[arg(long, global = true)]
  pub no_color: bool,

  #[clap(flatten)]
  pub verbose: Verbosity,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
  /// Ensure the kube-apiserver deployment admission plugins and CSI feature gates
  Apiserver(commands::apiserver::ApiServer),

  /// Ensure the kube-controller-manager deployment uses the external cloud provider
  ControllerManager(commands::controller_manager::ControllerManager),

  /// Ensure the kubelet service ExecStart sets the provider id and external cloud provider
  KubeletUnit(commands::kubelet_unit::KubeletUnit),

  /// Ensure the kubelet configuration CSI feature gates
  KubeletConfig(commands::kubelet_config::KubeletConfig),
}
