use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::error::KeepsakeError;

#[derive(Parser, Debug)]
#[command(name = "keepsake")]
#[command(version)]
#[command(about = "Publish Move packages, mint NFTs and drive a marketplace over Sui JSON-RPC", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding default.toml and per-environment overrides
    #[arg(long, global = true, env = "KEEPSAKE_CONFIG_DIR", default_value = "config")]
    pub config_dir: PathBuf,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    #[command(flatten)]
    Node(NodeCommand),
    /// Generate a new key; talks to no node
    Keygen,
}

/// Actions that sign or query through the configured node
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum NodeCommand {
    /// Publish every module of the configured package
    Deploy,
    /// Publish a single module and record it under `individual`
    Contract {
        /// Module name, without the .mv extension
        module: String,
    },
    /// Transfer an owned object
    Transfer {
        object_id: String,
        /// Defaults to transfer.default_recipient
        recipient: Option<String>,
    },
    /// Create a marketplace owned by the signer
    Create {
        /// Marketplace module (default: package.marketplace_module)
        module: Option<String>,
    },
    /// Mint an NFT and transfer it to a recipient
    Mint { recipient: String },
    /// Mint an NFT and list it on the market
    List {
        /// Asking price (default: market.list_price)
        price: Option<u64>,
    },
    /// Buy a listing
    Buy { listing: String },
    /// Mint, auction, bid twice and settle
    Auction,
    /// Mint the ingredient tree in dependency order
    Craft,
    /// Show gas coins owned by the signer
    Coins,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Node(command) => command.name(),
            Commands::Keygen => "keygen",
        }
    }
}

impl NodeCommand {
    pub fn name(&self) -> &'static str {
        match self {
            NodeCommand::Deploy => "deploy",
            NodeCommand::Contract { .. } => "contract",
            NodeCommand::Transfer { .. } => "transfer",
            NodeCommand::Create { .. } => "create",
            NodeCommand::Mint { .. } => "mint",
            NodeCommand::List { .. } => "list",
            NodeCommand::Buy { .. } => "buy",
            NodeCommand::Auction => "auction",
            NodeCommand::Craft => "craft",
            NodeCommand::Coins => "coins",
        }
    }
}

impl Cli {
    /// Command to run; `deploy` when none is given.
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Node(NodeCommand::Deploy))
    }
}

/// Why the command line was rejected
#[derive(Debug)]
pub enum ParseFailure {
    /// Not one of the known actions
    Unknown(KeepsakeError),
    /// Anything else clap reports, including --help and --version
    Clap(clap::Error),
}

pub fn try_parse_from<I, T>(args: I) -> Result<Cli, ParseFailure>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|err| {
        if err.kind() != ErrorKind::InvalidSubcommand {
            return ParseFailure::Clap(err);
        }
        let name = match err.get(ContextKind::InvalidSubcommand) {
            Some(ContextValue::String(name)) => name.clone(),
            _ => "<unknown>".to_string(),
        };
        ParseFailure::Unknown(KeepsakeError::UnknownAction(name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        match try_parse_from(args) {
            Ok(cli) => cli,
            Err(e) => panic!("parse failed: {e:?}"),
        }
    }

    #[test]
    fn test_no_subcommand_means_deploy() {
        let cli = parse(&["keepsake"]);
        assert_eq!(cli.command(), Commands::Node(NodeCommand::Deploy));
        assert_eq!(cli.config_dir, PathBuf::from("config"));
    }

    #[test]
    fn test_positional_arguments() {
        let cli = parse(&["keepsake", "transfer", "0xobj"]);
        assert_eq!(
            cli.command(),
            Commands::Node(NodeCommand::Transfer {
                object_id: "0xobj".to_string(),
                recipient: None
            })
        );

        let cli = parse(&["keepsake", "list", "900", "--json"]);
        assert_eq!(
            cli.command(),
            Commands::Node(NodeCommand::List { price: Some(900) })
        );
        assert!(cli.json);
        assert_eq!(cli.command().name(), "list");
    }

    #[test]
    fn test_unknown_action_is_explicit() {
        match try_parse_from(["keepsake", "explode"]) {
            Err(ParseFailure::Unknown(err)) => {
                assert!(matches!(err, KeepsakeError::UnknownAction(ref n) if n == "explode"));
                assert_eq!(err.exit_code(), 2);
            }
            other => panic!("expected unknown action, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_argument_is_clap_error() {
        assert!(matches!(
            try_parse_from(["keepsake", "list", "not-a-number"]),
            Err(ParseFailure::Clap(_))
        ));
    }

    #[test]
    fn test_keygen_is_kept_apart_from_node_actions() {
        assert_eq!(parse(&["keepsake", "keygen"]).command(), Commands::Keygen);
        assert_eq!(Commands::Keygen.name(), "keygen");

        for action in ["deploy", "auction", "craft", "coins"] {
            match parse(&["keepsake", action]).command() {
                Commands::Node(command) => assert_eq!(command.name(), action),
                Commands::Keygen => panic!("{action} parsed as keygen"),
            }
        }
    }
}
