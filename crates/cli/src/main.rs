use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quizext_cli::cli::{Cli, Command};
use quizext_cli::commands::{deploy, keys, list, register};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quizext_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pool = quizext_db::create_pool(&cli.database_url).await?;

    match cli.command {
        Command::Migrate => {
            quizext_db::run_migrations(&pool).await?;
            println!("Migrations applied");
        }
        Command::GenerateKeys { key_set, bits } => {
            let key = keys::generate_keys(&pool, key_set, bits).await?;
            println!("Created key #{} in key set #{}", key.id, key.key_set_id);
        }
        Command::Register {
            platform,
            url_base,
            client_id,
            key_set,
        } => {
            let registration =
                register::register(&pool, platform, url_base.as_deref(), &client_id, key_set)
                    .await?;
            println!(
                "Created registration #{} for {} ({})",
                registration.id, platform, registration.issuer
            );
        }
        Command::Deploy {
            registration,
            deployment_id,
        } => {
            let deployment = deploy::deploy(&pool, registration, &deployment_id).await?;
            println!(
                "Added deployment {} to registration #{}",
                deployment.deployment_id, deployment.registration_id
            );
        }
        Command::List => {
            print!("{}", list::overview(&pool).await?);
        }
    }

    Ok(())
}
