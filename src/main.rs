use keepsake::actions::{self, account};
use keepsake::cli::{self, Commands, ParseFailure};
use keepsake::error::Result;
use keepsake::output::OutputMode;
use tracing::error;

mod main_runtime;

use main_runtime::{build_context, failure_message, init_logging, init_logging_simple};

#[tokio::main]
async fn main() {
    let cli = match cli::try_parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(ParseFailure::Clap(err)) => err.exit(),
        Err(ParseFailure::Unknown(err)) => {
            eprintln!("✗ {err}");
            eprintln!("Run `keepsake --help` for the list of actions.");
            std::process::exit(err.exit_code());
        }
    };

    let command = match cli.command() {
        Commands::Keygen => {
            init_logging_simple();
            account::keygen();
            return;
        }
        Commands::Node(command) => command,
    };

    let guard = init_logging();
    let mode = OutputMode::from_json_flag(cli.json);
    let result: Result<()> = async {
        let ctx = build_context(&cli.config_dir)?;
        actions::run(&ctx, &command, mode).await
    }
    .await;

    if let Err(err) = result {
        error!("{}", failure_message(command.name(), &err));
        eprintln!("✗ {err}");
        drop(guard);
        std::process::exit(err.exit_code());
    }
}
