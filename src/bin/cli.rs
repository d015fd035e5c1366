use clap::{Parser, Subcommand};
use dialoguer::Input;
use dotenvy::dotenv;

use sproutplan::cli::seeder::{
    LocationsPerTenant, SeedConfig, UsersPerTenant, clear_seeded_data, seed_all,
};
use sproutplan::cli::{create_superadmin, mint_token};
use sproutplan_config::JwtConfig;

#[derive(Parser)]
#[command(name = "sproutplan-cli")]
#[command(about = "Sproutplan CLI - Administrative tools for Sproutplan", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new superadmin account
    CreateSuperadmin {
        /// First name of the superadmin
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the superadmin
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,
    },
    /// Mint an access token for an existing user
    MintToken {
        /// Email address of the user
        #[arg(short = 'e', long)]
        email: String,
    },
    /// Seed the database with fake tenants, staff, and lesson plans
    Seed {
        /// Number of tenants to create
        #[arg(short = 't', long, default_value = "5")]
        tenants: usize,

        /// Locations per tenant
        #[arg(long, default_value = "2")]
        locations: usize,

        /// Rooms per location
        #[arg(long, default_value = "3")]
        rooms: usize,

        /// Teachers per tenant
        #[arg(long, default_value = "4")]
        teachers: usize,

        /// Weeks of plans per room
        #[arg(long, default_value = "2")]
        weeks: usize,
    },
    /// Clear all seeded data (keeps superadmins)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Initialize database connection
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateSuperadmin {
            first_name,
            last_name,
            email,
        } => handle_create_superadmin(&pool, first_name, last_name, email).await,
        Commands::MintToken { email } => handle_mint_token(&pool, &email).await,
        Commands::Seed {
            tenants,
            locations,
            rooms,
            teachers,
            weeks,
        } => handle_seed(&pool, tenants, locations, rooms, teachers, weeks).await,
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }
}

async fn handle_create_superadmin(
    pool: &sqlx::postgres::PgPool,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
) {
    // Use provided values or prompt interactively
    let first_name = first_name.unwrap_or_else(|| {
        Input::new()
            .with_prompt("First name")
            .interact_text()
            .expect("Failed to read first name")
    });

    let last_name = last_name.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Last name")
            .interact_text()
            .expect("Failed to read last name")
    });

    let email = email.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Email address")
            .interact_text()
            .expect("Failed to read email")
    });

    match create_superadmin(pool, &first_name, &last_name, &email).await {
        Ok(user_id) => {
            println!("\n✅ Superadmin created successfully!");
            println!("   ID: {}", user_id);
            println!("   Email: {}", email);
            println!("   Name: {} {}", first_name, last_name);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating superadmin: {}", e);
            std::process::exit(1);
        }
    }

    // A fresh superadmin has no way to log in, so hand them a token right away
    match mint_token(pool, &email, &JwtConfig::from_env()).await {
        Ok(token) => {
            println!("\n🔑 Access token:");
            println!("{}", token);
        }
        Err(e) => {
            eprintln!("\n❌ Error minting token: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_mint_token(pool: &sqlx::postgres::PgPool, email: &str) {
    match mint_token(pool, email, &JwtConfig::from_env()).await {
        Ok(token) => {
            println!("🔑 Access token for {}:", email);
            println!("{}", token);
        }
        Err(e) => {
            eprintln!("❌ Error minting token: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(
    pool: &sqlx::postgres::PgPool,
    tenants: usize,
    locations: usize,
    rooms: usize,
    teachers: usize,
    weeks: usize,
) {
    let config = SeedConfig::new(tenants)
        .with_locations(LocationsPerTenant {
            count: locations,
            rooms_per_location: rooms,
        })
        .with_users(UsersPerTenant {
            teachers,
            ..Default::default()
        })
        .with_weeks(weeks);

    match seed_all(pool, config).await {
        Ok(_) => {}
        Err(e) => {
            eprintln!("\n❌ Error seeding database: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_clear_seed(pool: &sqlx::postgres::PgPool) {
    match clear_seeded_data(pool).await {
        Ok(_) => {}
        Err(e) => {
            eprintln!("\n❌ Error clearing seeded data: {}", e);
            std::process::exit(1);
        }
    }
}
