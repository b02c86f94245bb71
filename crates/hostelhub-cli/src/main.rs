use hostelhub_cli::admin;
use hostelhub_db::{PgIdentityStore, init_db_pool, run_migrations};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "hostelhub-cli")]
#[command(about = "HostelHub CLI - Identity administration for HostelHub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new administrator account
    CreateAdmin {
        /// Display name of the admin
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Login handle (employee ID)
        #[arg(short = 'u', long)]
        handle: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Deactivate an identity so it can no longer log in
    Deactivate {
        #[arg(short = 'u', long)]
        handle: String,
    },
    /// Reactivate a deactivated identity
    Activate {
        #[arg(short = 'u', long)]
        handle: String,
    },
    /// Set a new password for an identity
    ResetPassword {
        #[arg(short = 'u', long)]
        handle: String,

        /// New password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Apply pending database migrations
    Migrate,
}

fn prompt_text(prompt: &str) -> String {
    match Input::<String>::new().with_prompt(prompt).interact_text() {
        Ok(value) => value,
        Err(e) => fail(&format!("Failed to read {}", prompt.to_lowercase()), e),
    }
}

fn prompt_password() -> String {
    match Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords don't match")
        .interact()
    {
        Ok(value) => value,
        Err(e) => fail("Failed to read password", e),
    }
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("\n❌ {}: {}", context, err);
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let pool = match init_db_pool().await {
        Ok(pool) => pool,
        Err(e) => fail("Database unavailable", format!("{:#}", e)),
    };

    if let Commands::Migrate = cli.command {
        match run_migrations(&pool).await {
            Ok(()) => println!("✅ Migrations applied"),
            Err(e) => fail("Error running migrations", e),
        }
        return;
    }

    let store = PgIdentityStore::new(pool);

    match cli.command {
        Commands::CreateAdmin {
            name,
            handle,
            password,
        } => {
            let name = name.unwrap_or_else(|| prompt_text("Name"));
            let handle = handle.unwrap_or_else(|| prompt_text("Handle"));
            let password = password.unwrap_or_else(prompt_password);

            match admin::create_admin(&store, &name, &handle, &password).await {
                Ok(identity) => {
                    println!("\n✅ Admin created successfully!");
                    println!("   Handle: {}", identity.handle);
                    println!("   Name: {}", identity.name);
                }
                Err(e) => fail("Error creating admin", format!("{:#}", e)),
            }
        }
        Commands::Deactivate { handle } => match admin::set_active(&store, &handle, false).await {
            Ok(identity) => println!("✅ {} deactivated", identity.handle),
            Err(e) => fail("Error deactivating identity", format!("{:#}", e)),
        },
        Commands::Activate { handle } => match admin::set_active(&store, &handle, true).await {
            Ok(identity) => println!("✅ {} activated", identity.handle),
            Err(e) => fail("Error activating identity", format!("{:#}", e)),
        },
        Commands::ResetPassword { handle, password } => {
            let password = password.unwrap_or_else(prompt_password);
            match admin::reset_password(&store, &handle, &password).await {
                Ok(()) => println!("✅ Password reset for {}", handle.trim().to_uppercase()),
                Err(e) => fail("Error resetting password", format!("{:#}", e)),
            }
        }
        Commands::Migrate => {}
    }
}
