//! Create a doctor login (user row plus doctor profile) in one transaction.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use clinica::config::{DatabaseSettings, database_settings_from_env, database_settings_from_url};
use clinica::domain::{DoctorOnboardingService, DoctorRegistration};
use clinica::outbound::persistence::{DbPool, DieselDoctorProvisioning, PoolConfig};
use mockable::DefaultEnv;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::runtime::Builder;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};
use zeroize::Zeroizing;

/// `provision-doctor` command arguments. Omitted fields are prompted for.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "provision-doctor",
    about = "Create a doctor account that can log in to the clinic",
    version
)]
struct CliArgs {
    /// Doctor's full name.
    #[arg(long = "full-name", value_name = "name")]
    full_name: Option<String>,
    /// Doctor's RUT.
    #[arg(long, value_name = "rut")]
    rut: Option<String>,
    /// Login email.
    #[arg(long, value_name = "email")]
    email: Option<String>,
    /// Login password. Prefer the prompt so it stays out of shell history.
    #[arg(long, value_name = "password")]
    password: Option<String>,
    /// Database connection URL. Falls back to `DATABASE_URL`, then `DB_*`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

#[expect(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "the operator reads the outcome on the terminal"
)]
fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {e}");
    }

    let runtime = match Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("\n❌ Ocurrió un error: create Tokio runtime: {error}");
            return ExitCode::FAILURE;
        }
    };
    match runtime.block_on(async_main()) {
        Ok(email) => {
            println!("\n✅ ¡Doctor creado exitosamente!");
            println!("   Email: {email}");
            println!("   Ahora puedes usar estas credenciales para iniciar sesión.");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("\n❌ Ocurrió un error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn async_main() -> io::Result<String> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let full_name = field(args.full_name, "Introduce el nombre completo del doctor: ", &mut lines).await?;
    let rut = field(args.rut, "Introduce el RUT del doctor: ", &mut lines).await?;
    let email = field(args.email, "Introduce el email para el login: ", &mut lines).await?;
    let password = Zeroizing::new(
        field(args.password, "Introduce la contraseña para el login: ", &mut lines).await?,
    );

    let registration = DoctorRegistration::try_from_parts(&full_name, &rut, &email, &password)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;

    let database = resolve_database(args.database_url)?;
    info!(database = %database.redacted_url(), "connecting");
    let pool = DbPool::new(PoolConfig::new(database.url()))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let service = DoctorOnboardingService::new(Arc::new(DieselDoctorProvisioning::new(pool)));
    service
        .register(&registration)
        .await
        .map_err(|error| io::Error::other(error.message().to_owned()))?;

    Ok(registration.email().to_owned())
}

/// Use the flag value when given, otherwise prompt on stdin.
async fn field(
    given: Option<String>,
    prompt: &str,
    lines: &mut Lines<BufReader<Stdin>>,
) -> io::Result<String> {
    if let Some(value) = given {
        return Ok(value);
    }
    let mut stdout = tokio::io::stdout();
    stdout.write_all(prompt.as_bytes()).await?;
    stdout.flush().await?;
    lines.next_line().await?.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("stdin closed before answering: {}", prompt.trim_end_matches(": ")),
        )
    })
}

fn resolve_database(flag: Option<String>) -> io::Result<DatabaseSettings> {
    let settings = flag.map_or_else(
        || database_settings_from_env(&DefaultEnv::new()),
        database_settings_from_url,
    )?;
    Ok(settings)
}
