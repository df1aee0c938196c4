//! service-hub - headless client for the company search and booking backend
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use clap::{Parser, Subcommand};

use svchub_api::ApiClient;
use svchub_app::{AuthOrchestrator, ExpiryPolicy, SearchOrchestrator, SessionStore};
use svchub_core::geo::Coordinate;
use svchub_core::Result;

/// Headless client for the service-company search and booking backend
#[derive(Parser, Debug)]
#[command(name = "svchub")]
#[command(about = "Search and book local service companies", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for companies around a location
    Search {
        /// Free-text company or service filter
        #[arg(long, default_value = "")]
        query: String,

        /// Search center latitude; defaults to the built-in center
        #[arg(long, requires = "longitude")]
        latitude: Option<f64>,

        /// Search center longitude
        #[arg(long, requires = "latitude")]
        longitude: Option<f64>,

        /// Search radius in kilometers
        #[arg(long, default_value_t = 25.0)]
        radius: f64,

        /// Minimum average rating, 0-5
        #[arg(long, default_value_t = 0)]
        rating: i32,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,
}

#[tokio::main]
async fn main() -> Result<()> {
    svchub_core::logging::init()?;

    let args = Args::parse();
    let store = SessionStore::load();
    let policy = ExpiryPolicy::new(store.clone());
    let client = ApiClient::from_env();

    match args.command {
        Command::Search {
            query,
            latitude,
            longitude,
            radius,
            rating,
            json,
        } => {
            let search = SearchOrchestrator::new(client, store, policy.clone());
            search.set_search_text(query);
            search.set_minimum_rating(rating);
            search.set_radius_kilometers(radius);
            if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
                let center = Coordinate::new(latitude, longitude);
                if let Some(task) = search.update_user_location(center) {
                    let _ = task.await;
                }
            } else {
                search.search().await;
            }

            let snapshot = search.snapshot();
            if policy.needs_login() {
                eprintln!("Session expired. Run `svchub login` and try again.");
                std::process::exit(1);
            }
            if let Some(error) = snapshot.error {
                eprintln!("Search failed: {error}");
                std::process::exit(1);
            }
            print_companies(&snapshot.companies, json)?;
        }
        Command::Login { email, password } => {
            let auth = AuthOrchestrator::new(client, store.clone(), policy);
            if auth.login(&email, &password).await {
                let user = store.user().map(|u| u.email).unwrap_or(email);
                println!("Logged in as {user}");
            } else {
                let message = auth
                    .snapshot()
                    .error
                    .unwrap_or_else(|| "Login failed.".to_string());
                eprintln!("{message}");
                std::process::exit(1);
            }
        }
        Command::Logout => {
            store.clear();
            println!("Session cleared");
        }
        Command::Whoami => match store.user() {
            Some(user) => println!("{} {} <{}>", user.name, user.surname, user.email),
            None => {
                eprintln!("Not logged in");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn print_companies(
    companies: &[svchub_core::models::CompanySummary],
    json: bool,
) -> Result<()> {
    if json {
        let entries: Vec<serde_json::Value> = companies
            .iter()
            .map(|company| {
                serde_json::json!({
                    "uuid": company.uuid,
                    "name": company.name,
                    "address": company.address,
                    "rating": company.average_rating,
                    "distanceMeters": company.distance,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if companies.is_empty() {
        println!("No companies found");
        return Ok(());
    }
    for company in companies {
        let distance = company
            .formatted_distance()
            .map(|d| format!(" ({d})"))
            .unwrap_or_default();
        println!(
            "{}  {}{}",
            company.formatted_rating(),
            company.name,
            distance
        );
    }
    Ok(())
}
