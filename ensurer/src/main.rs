use anyhow::Result;
use clap::Parser;
use ensurer::{Cli, Commands};
use tracing_log::AsTrace;
use tracing_subscriber::FmtSubscriber;

#[cfg(not(tarpaulin_include))]
fn main() -> Result<()> {
  let cli = Cli::parse();
  let subscriber = FmtSubscriber::builder()
    .with_max_level(cli.verbose.log_level_filter().as_trace())
    .with_writer(std::io::stderr)
    .without_time()
    .with_ansi(!cli.no_color)
    .finish();
  tracing::subscriber::set_global_default(subscriber).expect("Setting default subscriber failed");

  match &cli.command {
    Commands::Apiserver(apiserver) => apiserver.ensure(),
    Commands::ControllerManager(controller_manager) => controller_manager.ensure(),
    Commands::KubeletUnit(unit) => unit.ensure(),
    Commands::KubeletConfig(config) => config.ensure(),
  }
}
