//! coffee-env CLI - inspect and check the client environment record
//!
//! ```bash
//! coffee-env show                         # Resolved record as JSON
//! coffee-env --profile prod check         # Validate, exit 1 on failure
//! coffee-env --file env.json endpoints    # Backend routes + permissions
//! coffee-env login-link --callback-path /tabs/user-page
//! coffee-env schema                       # Embedded JSON Schema
//! ```
//!
//! `.env` is loaded first, so `COFFEE_*` overrides can live there.

use clap::{Parser, Subcommand};
use coffee_env::{
    environment_schema, load, production_warnings, resolve, validate_environment,
    LoadOptions, Permission, Profile,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "coffee-env")]
#[command(about = "Inspect and check the Coffee Shop client environment", long_about = None)]
struct Cli {
    /// Built-in profile (dev, prod)
    #[arg(short, long, global = true, default_value = "development")]
    profile: Profile,

    /// JSON profile file replacing the built-in values
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Ignore COFFEE_* environment variables
    #[arg(long, global = true)]
    no_env: bool,

    /// Log resolution steps
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved record as JSON
    Show,

    /// Validate the resolved record
    Check,

    /// Print backend routes and permission names
    Endpoints,

    /// Print the identity-provider login link
    LoginLink {
        /// Path appended to the callback URL
        #[arg(long, default_value = "")]
        callback_path: String,

        /// Print the logout link instead
        #[arg(long)]
        logout: bool,
    },

    /// Print the embedded JSON Schema
    Schema,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = LoadOptions {
        profile: cli.profile,
        file: cli.file,
        use_env: !cli.no_env,
    };

    let result = match cli.command {
        Commands::Show => cmd_show(&options),
        Commands::Check => cmd_check(&options),
        Commands::Endpoints => cmd_endpoints(&options),
        Commands::LoginLink {
            callback_path,
            logout,
        } => cmd_login_link(&options, &callback_path, logout),
        Commands::Schema => cmd_schema(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info,coffee_env=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_show(options: &LoadOptions) -> Result<(), Box<dyn std::error::Error>> {
    let env = load(options)?;
    println!("{}", env.to_json()?);
    Ok(())
}

fn cmd_check(options: &LoadOptions) -> Result<(), Box<dyn std::error::Error>> {
    match &options.file {
        Some(path) => eprintln!("✔️  Checking: {}", path.display()),
        None => eprintln!("✔️  Checking built-in profile: {}", options.profile),
    }

    let env = resolve(options)?;

    if let Err(e) = validate_environment(&env) {
        eprintln!("\n❌ Environment invalid:");
        for err in e.errors() {
            eprintln!("   - {}", err);
        }
        std::process::exit(1);
    }

    let warnings = production_warnings(&env);
    for warning in &warnings {
        eprintln!("   ⚠️  {}", warning);
    }

    eprintln!(
        "✅ Environment valid ({}{})",
        if env.production { "production" } else { "development" },
        if warnings.is_empty() {
            String::new()
        } else {
            format!(", {} warning(s)", warnings.len())
        }
    );
    Ok(())
}

fn cmd_endpoints(options: &LoadOptions) -> Result<(), Box<dyn std::error::Error>> {
    let env = load(options)?;

    println!("API:    {}", env.api_server_url);
    println!("  GET    {}", env.drinks_url());
    println!("  GET    {}  [{}]", env.drinks_detail_url(), Permission::GetDrinksDetail);
    println!("  POST   {}  [{}]", env.drinks_url(), Permission::PostDrinks);
    println!("  PATCH  {}  [{}]", env.drink_url(1), Permission::PatchDrinks);
    println!("  DELETE {}  [{}]", env.drink_url(1), Permission::DeleteDrinks);
    println!();
    println!("Auth:   {}", env.auth.auth_domain());
    println!("  audience: {}", env.auth.audience);
    println!("  callback: {}", env.auth.callback_url);
    Ok(())
}

fn cmd_login_link(
    options: &LoadOptions,
    callback_path: &str,
    logout: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let env = load(options)?;
    let link = if logout {
        env.auth.logout_url()?
    } else {
        env.auth.login_url(callback_path)?
    };
    println!("{}", link);
    Ok(())
}

fn cmd_schema() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(environment_schema())?);
    Ok(())
}
