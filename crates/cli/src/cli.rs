use clap::{Parser, Subcommand};
use quizext_core::platform::PlatformPreset;
use quizext_core::types::DbId;

use crate::commands::keys::DEFAULT_KEY_BITS;

#[derive(Debug, Parser)]
#[command(
    name = "quizext-admin",
    version,
    about = "Manage Quiz Extensions LTI keys, registrations and deployments"
)]
pub struct Cli {
    /// PostgreSQL connection string.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply pending database migrations
    Migrate,
    /// Generate an RSA signing key pair for the tool
    GenerateKeys {
        /// Key set to add the key to (a new key set is created when omitted)
        #[arg(long)]
        key_set: Option<DbId>,
        /// RSA modulus size in bits
        #[arg(long, default_value_t = DEFAULT_KEY_BITS)]
        bits: usize,
    },
    /// Register the tool with a Canvas platform
    Register {
        /// production, test, beta or other
        #[arg(long)]
        platform: PlatformPreset,
        /// Canvas server url, required for `other`
        #[arg(long)]
        url_base: Option<String>,
        /// Client id of the Canvas developer key
        #[arg(long)]
        client_id: String,
        /// Key set the platform uses to verify tool messages
        #[arg(long)]
        key_set: DbId,
    },
    /// Add a deployment to a registration
    Deploy {
        #[arg(long)]
        registration: DbId,
        /// Deployment id shown by Canvas for the installed tool
        #[arg(long)]
        deployment_id: String,
    },
    /// Show key sets, registrations and deployments
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        let mut full = vec!["quizext-admin", "--database-url", "postgres://localhost/quizext"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full)
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_keys_defaults() {
        let cli = parse(&["generate-keys"]).unwrap();
        match cli.command {
            Command::GenerateKeys { key_set, bits } => {
                assert_eq!(key_set, None);
                assert_eq!(bits, 4096);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn register_parses_platform() {
        let cli = parse(&[
            "register",
            "--platform",
            "beta",
            "--client-id",
            "10000000000001",
            "--key-set",
            "3",
        ])
        .unwrap();
        match cli.command {
            Command::Register {
                platform,
                url_base,
                client_id,
                key_set,
            } => {
                assert_eq!(platform, PlatformPreset::Beta);
                assert_eq!(url_base, None);
                assert_eq!(client_id, "10000000000001");
                assert_eq!(key_set, 3);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn register_rejects_unknown_platform() {
        let err = parse(&[
            "register",
            "--platform",
            "staging",
            "--client-id",
            "1",
            "--key-set",
            "1",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("Invalid platform 'staging'"));
    }

    #[test]
    fn deploy_requires_both_ids() {
        assert!(parse(&["deploy", "--registration", "1"]).is_err());
        let cli = parse(&["deploy", "--registration", "1", "--deployment-id", "1:abc"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Deploy { registration: 1, ref deployment_id } if deployment_id == "1:abc"
        ));
    }
}
