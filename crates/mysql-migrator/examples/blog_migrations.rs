//! Example: Blog Application Migrations
//!
//! Manages the schema of a small blog (users, posts, comments) from the
//! command line.
//!
//! Run with: cargo run --example blog_migrations -p mysql-migrator -- sql
//!
//! Commands other than `sql` need a reachable MySQL server:
//! DATABASE_URL=mysql://root@localhost/blog cargo run --example blog_migrations -- migrate

use clap::{Parser, Subcommand};
use sqlx::Connection as _;
use sqlx::MySqlConnection;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mysql_migrator::prelude::*;

/// Blog schema migrations.
#[derive(Parser)]
#[command(name = "blog-migrations")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// MySQL connection string.
    #[arg(short, long, env = "DATABASE_URL", default_value = "mysql://root@localhost/blog")]
    database_url: String,

    /// Tracking table name.
    #[arg(short, long, default_value = "migrations")]
    table: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations as a new batch.
    Migrate,

    /// Revert the most recent batch.
    Rollback,

    /// Revert every applied migration.
    Revert,

    /// Show which migrations have been applied.
    Status {
        /// Print the status as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the SQL of every migration without connecting.
    Sql {
        /// Show rollback SQL instead of forward SQL.
        #[arg(short, long)]
        down: bool,
    },
}

// =============================================================================
// Migration Definitions
// =============================================================================

fn create_users() -> Migration {
    Migration::new(
        "20240101_0001_create_users_table",
        || {
            let mut users = Table::new("users");
            users.id("id");
            users.column("username", Char::varchar(100));
            users.column("email", Char::varchar(255));
            users.column(
                "role",
                Enum::new(["reader", "author", "admin"]).default_value("reader"),
            );
            users.boolean("active", "1");
            users.timestamps();
            users.unique(["email"]);
            users.comment("Registered accounts");

            let mut schema = Schema::new();
            schema.create_table(users);
            schema
        },
        || {
            let mut schema = Schema::new();
            schema.drop_table_if_exists("users");
            schema
        },
    )
}

fn create_posts() -> Migration {
    Migration::new(
        "20240101_0002_create_posts_table",
        || {
            let mut posts = Table::new("posts");
            posts.unique_id("id");
            posts.column("user_id", Integer::new().prefix("big").unsigned());
            posts.column("title", Char::varchar(64));
            posts.column("content", Text::new().prefix("medium"));
            posts.column("metadata", Json::new().nullable());
            posts.timestamps();
            posts.foreign("user_id", "id", "users", "", "cascade");

            let mut schema = Schema::new();
            schema.create_table(posts);
            schema
        },
        || {
            let mut schema = Schema::new();
            schema.drop_table_if_exists("posts");
            schema
        },
    )
    .transactional(true)
}

fn create_comments() -> Migration {
    Migration::new(
        "20240102_0001_create_comments_table",
        || {
            let mut comments = Table::new("comments");
            comments.id("id");
            comments.uuid("post_id", "", false);
            comments.column("body", Text::new());
            comments.column("score", Floatable::new("decimal").precision(5).scale(2));
            comments.timestamps();
            comments.index("comments_created_at_index", ["created_at"]);
            comments.foreign("post_id", "id", "posts", "cascade", "cascade");

            let mut schema = Schema::new();
            schema.create_table(comments);
            schema
        },
        || {
            let mut schema = Schema::new();
            schema.drop_table_if_exists("comments");
            schema
        },
    )
}

fn add_post_slug() -> Migration {
    Migration::new(
        "20240103_0001_add_slug_to_posts",
        || {
            let mut schema = Schema::new();
            schema.alter_table(
                "posts",
                vec![
                    TableCommand::add_column_after("slug", Char::varchar(80).nullable(), "title"),
                    TableCommand::AddUniqueIndex {
                        key: "posts_slug_unique".to_string(),
                        columns: vec!["slug".to_string()],
                    },
                ],
            );
            schema
        },
        || {
            let mut schema = Schema::new();
            schema.alter_table(
                "posts",
                vec![
                    TableCommand::DropIndex("posts_slug_unique".to_string()),
                    TableCommand::DropColumn("slug".to_string()),
                ],
            );
            schema
        },
    )
}

fn migrations() -> Vec<Migration> {
    vec![
        create_users(),
        create_posts(),
        create_comments(),
        add_post_slug(),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut migrator = Migrator::new(migrations()).with_table_name(&cli.table);

    if let Commands::Sql { down } = cli.command {
        migrator.check_pool()?;
        for migration in migrator.migrations() {
            println!("\n-- Migration: {}", migration.name());
            let statements = if down {
                migration.down_sql()?
            } else {
                migration.up_sql()?
            };
            for sql in statements {
                println!("{sql};");
            }
        }
        return Ok(());
    }

    let mut conn = MySqlConnection::connect(&cli.database_url).await?;

    match cli.command {
        Commands::Migrate => {
            let applied = migrator.migrate(&mut conn).await?;
            info!(count = applied.len(), "Migrations applied");
        }

        Commands::Rollback => {
            let reverted = migrator.rollback(&mut conn).await?;
            info!(count = reverted.len(), "Batch rolled back");
        }

        Commands::Revert => {
            let reverted = migrator.revert(&mut conn).await?;
            info!(count = reverted.len(), "Migrations reverted");
        }

        Commands::Status { json } => {
            let status = migrator.status(&mut conn).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("\nMigrations:");
                println!("{:-<60}", "");
                for entry in &status {
                    let mark = if entry.executed { "X" } else { " " };
                    match (entry.batch, entry.applied_at) {
                        (Some(batch), Some(applied_at)) => println!(
                            " [{mark}] {} (batch {batch}, {})",
                            entry.name,
                            applied_at.format("%Y-%m-%d %H:%M:%S")
                        ),
                        (Some(batch), None) => {
                            println!(" [{mark}] {} (batch {batch})", entry.name);
                        }
                        _ => println!(" [{mark}] {}", entry.name),
                    }
                }
                println!();
            }
        }

        Commands::Sql { .. } => unreachable!("handled before connecting"),
    }

    conn.close().await?;
    Ok(())
}
