use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lreg",
    about = "LedgerRegistry: access-controlled content-hash registry",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a registry and publish its address
    Deploy(DeployArgs),
    /// Print the content digest of a file
    Digest(DigestArgs),
    /// Run a registration walkthrough against an in-process registry
    Demo(DemoArgs),
}

#[derive(Args)]
pub struct DeployArgs {
    /// Name the deployer identity is derived from
    #[arg(long, default_value = "deployer")]
    pub deployer: String,
    /// Per-deployer nonce used to derive the registry address
    #[arg(long, default_value = "0")]
    pub nonce: u64,
    /// TOML file with publication settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Cache key namespace
    #[arg(long)]
    pub namespace: Option<String>,
    /// Network label recorded in the provenance record
    #[arg(long)]
    pub network: Option<String>,
    /// JSON file used as the address cache
    #[arg(long)]
    pub cache: Option<PathBuf>,
    /// Attempts per cache write
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

#[derive(Args)]
pub struct DigestArgs {
    pub path: PathBuf,
    /// Hash as a structured record instead of a raw document
    #[arg(long)]
    pub record: bool,
}

#[derive(Args)]
pub struct DemoArgs {
    /// Organization tag for the sample entry
    #[arg(long, default_value = "1")]
    pub org: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_deploy_defaults() {
        let cli = Cli::try_parse_from(["lreg", "deploy"]).unwrap();
        if let Command::Deploy(args) = cli.command {
            assert_eq!(args.deployer, "deployer");
            assert_eq!(args.nonce, 0);
            assert!(args.cache.is_none());
            assert!(args.namespace.is_none());
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_deploy_overrides() {
        let cli = Cli::try_parse_from([
            "lreg",
            "deploy",
            "--namespace",
            "vericerti",
            "--cache",
            "/tmp/cache.json",
            "--nonce",
            "7",
            "--max-attempts",
            "5",
        ])
        .unwrap();
        if let Command::Deploy(args) = cli.command {
            assert_eq!(args.namespace.as_deref(), Some("vericerti"));
            assert_eq!(args.cache, Some(PathBuf::from("/tmp/cache.json")));
            assert_eq!(args.nonce, 7);
            assert_eq!(args.max_attempts, Some(5));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_digest() {
        let cli = Cli::try_parse_from(["lreg", "digest", "report.pdf"]).unwrap();
        if let Command::Digest(args) = cli.command {
            assert_eq!(args.path, PathBuf::from("report.pdf"));
            assert!(!args.record);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn digest_requires_path() {
        assert!(Cli::try_parse_from(["lreg", "digest"]).is_err());
    }

    #[test]
    fn parse_demo() {
        let cli = Cli::try_parse_from(["lreg", "demo", "--org", "42"]).unwrap();
        if let Command::Demo(args) = cli.command {
            assert_eq!(args.org, 42);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["lreg", "--verbose", "demo"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["lreg", "--format", "json", "digest", "a.txt"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
