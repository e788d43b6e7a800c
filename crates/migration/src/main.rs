use clap::{Parser, Subcommand};
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::prelude::*;

/// Applies or inspects the `financial_data` schema outside the application.
#[derive(Parser, Debug)]
#[command(name = "migration")]
struct Cli {
    /// Database to migrate.
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./accounting.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Subcommand, Debug, Clone, Copy, Default)]
enum Action {
    /// Apply pending migrations (default).
    #[default]
    Up,
    /// Revert the last migration.
    Down,
    /// Drop everything and re-apply all migrations.
    Fresh,
    /// Print applied migrations and the current `financial_data` columns.
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter("migration=info,sea_orm_migration=info")
        .init();

    let mut options = ConnectOptions::new(&cli.database_url);
    options.sqlx_logging(false);
    let db = Database::connect(options).await?;

    match cli.action.unwrap_or_default() {
        Action::Up => migration::Migrator::up(&db, None).await?,
        Action::Down => migration::Migrator::down(&db, Some(1)).await?,
        Action::Fresh => migration::Migrator::fresh(&db).await?,
        Action::Status => {
            migration::Migrator::status(&db).await?;
            let columns = migration::financial_data_columns(&db).await?;
            if columns.is_empty() {
                println!("{} does not exist", migration::FINANCIAL_DATA);
            } else {
                println!("{}: {}", migration::FINANCIAL_DATA, columns.join(", "));
            }
        }
    }

    db.close().await?;
    Ok(())
}
