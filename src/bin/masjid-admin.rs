use anyhow::{Result, anyhow, bail};
use clap::{Parser, Subcommand};
use env_logger::Env;
use masjid_portal::config::Config;
use masjid_portal::database::create_pool;
use masjid_portal::scripts::{self, AdminSeed};

#[derive(Parser)]
#[command(name = "masjid-admin")]
#[command(about = "Maintenance commands for the masjid portal database")]
#[command(long_about = "\
Maintenance commands for the masjid portal database

Reads the same config.toml (or CONFIG_PATH / environment) as the web server.
Each command connects, does its work, prints a report and exits.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply pending schema migrations
    Migrate {
        /// List applied and pending migrations without applying anything
        #[arg(long)]
        status: bool,
    },
    /// Insert baseline categories, menu items, settings and a sample campaign
    Seed {
        /// Email of the admin account to create
        #[arg(long, requires = "admin_password")]
        admin_email: Option<String>,
        /// Password for the admin account
        #[arg(long, requires = "admin_email")]
        admin_password: Option<String>,
        #[arg(long, default_value = "Administrator")]
        admin_name: String,
    },
    /// Check the connection, count rows and look for menu href clashes
    Diagnose,
    /// Delete all transactions and every non-admin user
    ResetUsers {
        /// Required; without it nothing is deleted
        #[arg(long)]
        yes: bool,
    },
    /// Give an existing account the admin role
    PromoteAdmin { email: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::from_toml().map_err(|e| anyhow!("{e}"))?;
    let db = create_pool(&config.database).await?;

    match cli.command {
        Command::Migrate { status: true } => {
            let status = scripts::migration_status(&db).await?;
            println!("Applied ({}):", status.applied.len());
            for name in &status.applied {
                println!("  {name}");
            }
            println!("Pending ({}):", status.pending.len());
            for name in &status.pending {
                println!("  {name}");
            }
        }
        Command::Migrate { status: false } => {
            let applied = scripts::migrate(&db).await?;
            if applied.is_empty() {
                println!("Schema is up to date");
            } else {
                println!("Applied {} migrations", applied.len());
            }
        }
        Command::Seed {
            admin_email,
            admin_password,
            admin_name,
        } => {
            let admin = admin_email.zip(admin_password).map(|(email, password)| AdminSeed {
                name: admin_name,
                email,
                password,
            });
            let report = scripts::seed(&db, admin).await?;
            println!("Seed done: {report}");
        }
        Command::Diagnose => {
            let diagnosis = scripts::diagnose(&db).await?;
            diagnosis.print();
            if !diagnosis.is_healthy() {
                bail!("menu items share an href");
            }
        }
        Command::ResetUsers { yes: false } => {
            bail!("reset-users deletes every transaction and non-admin user; pass --yes to proceed");
        }
        Command::ResetUsers { yes: true } => {
            let report = scripts::reset_users(&db).await?;
            println!(
                "Deleted {} transactions and {} users",
                report.transactions, report.users
            );
        }
        Command::PromoteAdmin { email } => {
            scripts::promote_admin(&db, &email).await?;
        }
    }

    db.close().await?;
    Ok(())
}
