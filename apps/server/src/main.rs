use anyhow::Context;
use clap::{Parser, Subcommand};
use mealbox_config::load as load_config;
use mealbox_database::{
    ConversationProfile, ConversationRepository, CreateCategoryRequest, CreateFoodRequest,
    CreatePackageRequest, CreateRestaurantRequest, CategoryRepository, FoodRepository,
    MessageRepository, PackageRepository, RestaurantRepository,
};
use mealbox_gateway::{build_router, GatewayState};
use mealbox_runtime::{telemetry, BackendServices};
use sqlx::Row;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "mealbox-backend")]
#[command(about = "Mealbox backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Dump catalog and inbox contents from the database
    DumpData,
    /// Clear all catalog and inbox data from the database
    ClearData,
    /// Seed the database with test data
    SeedData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::DumpData => dump_data().await,
        Commands::ClearData => clear_data().await,
        Commands::SeedData => seed_data().await,
    }
}

async fn run_server() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("starting Mealbox backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = GatewayState::new(services.db_pool.clone(), config.inbox.clone());
    let app = build_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(mealbox_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn dump_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    for table in ["restaurants", "categories", "foods", "packages"] {
        let rows = sqlx::query(&format!(
            "SELECT public_id, name, sort_order FROM {table} ORDER BY sort_order ASC"
        ))
        .fetch_all(&services.db_pool)
        .await
        .with_context(|| format!("failed to fetch {table}"))?;

        println!("=== {} ===", table.to_uppercase());
        if rows.is_empty() {
            println!("(empty)");
        } else {
            println!("{:<28} {:<30} {:<10}", "Public ID", "Name", "Order");
            for row in rows {
                let public_id: String = row.get("public_id");
                let name: String = row.get("name");
                let sort_order: i64 = row.get("sort_order");
                println!("{:<28} {:<30} {:<10}", public_id, name, sort_order);
            }
        }
        println!();
    }

    let conversations = sqlx::query(
        "SELECT public_id, display_name, unread_count, last_message_at, is_active
         FROM conversations ORDER BY last_message_at DESC",
    )
    .fetch_all(&services.db_pool)
    .await
    .context("failed to fetch conversations")?;

    println!("=== CONVERSATIONS ===");
    if conversations.is_empty() {
        println!("(empty)");
    } else {
        println!(
            "{:<28} {:<24} {:<8} {:<28} {:<8}",
            "Public ID", "Display Name", "Unread", "Last Message At", "Active"
        );
        for row in conversations {
            let public_id: String = row.get("public_id");
            let display_name: String = row.get("display_name");
            let unread_count: i64 = row.get("unread_count");
            let last_message_at: Option<String> = row.get("last_message_at");
            let is_active: bool = row.get("is_active");

            println!(
                "{:<28} {:<24} {:<8} {:<28} {:<8}",
                public_id,
                display_name,
                unread_count,
                last_message_at.as_deref().unwrap_or("NULL"),
                is_active
            );
        }
    }

    Ok(())
}

async fn clear_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("clearing all data from database");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    // Children first, to satisfy foreign key constraints.
    for table in [
        "messages",
        "conversations",
        "foods",
        "categories",
        "packages",
        "restaurants",
    ] {
        let deleted = sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&services.db_pool)
            .await
            .with_context(|| format!("failed to delete {table}"))?;
        println!("- {} rows deleted from {table}", deleted.rows_affected());
    }

    Ok(())
}

async fn seed_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("seeding database with test data");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let restaurants = RestaurantRepository::new(services.db_pool.clone());
    restaurants
        .create(&CreateRestaurantRequest {
            name: "Green Bowl".to_string(),
            address: Some("12 Market St".to_string()),
            picture_url: None,
        })
        .await?;
    restaurants
        .create(&CreateRestaurantRequest {
            name: "Noodle House".to_string(),
            address: None,
            picture_url: None,
        })
        .await?;

    let categories = CategoryRepository::new(services.db_pool.clone());
    let soups = categories
        .create(&CreateCategoryRequest {
            name: "Soups".to_string(),
        })
        .await?;
    categories
        .create(&CreateCategoryRequest {
            name: "Mains".to_string(),
        })
        .await?;

    let foods = FoodRepository::new(services.db_pool.clone());
    foods
        .create(&CreateFoodRequest {
            category_id: soups.id,
            name: "Miso soup".to_string(),
            description: None,
            picture_url: None,
            price_cents: 450,
            calories: 120,
        })
        .await?;

    PackageRepository::new(services.db_pool.clone())
        .create(&CreatePackageRequest {
            name: "Lunch deal".to_string(),
            description: Some("Soup + main".to_string()),
            picture_url: None,
            price_cents: 1500,
        })
        .await?;

    let conversations = ConversationRepository::new(services.db_pool.clone());
    let ada = conversations
        .upsert_by_platform_user(&ConversationProfile {
            platform_user_id: "U100".to_string(),
            display_name: "Ada".to_string(),
            picture_url: None,
            status_text: Some("counting calories".to_string()),
        })
        .await?;

    let messages = MessageRepository::new(services.db_pool.clone());
    messages.record_incoming(ada.id, "hi, is the lunch deal on today?").await?;
    messages.record_outgoing(ada.id, "it is! soup + main for 15").await?;

    println!("Database seeded with test data:");
    println!("- 2 restaurants, 2 categories, 1 food, 1 package");
    println!("- 1 conversation with 2 messages");
    println!("Run 'dump-data' to see the inserted data");

    Ok(())
}
