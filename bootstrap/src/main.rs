mod args;
mod command;
mod locator;
mod telemetry;

use crate::args::CommonArgs;
use crate::command::Command;
use clap::Parser;

#[derive(Parser)]
#[command(name = "school-registry", version, about = "School registry REST service")]
struct Cli {
    #[command(flatten)]
    common_args: CommonArgs,
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let Cli {
        common_args,
        command,
    } = Cli::parse();
    let _sentry = telemetry::init(&common_args);

    command.run(common_args).await
}
