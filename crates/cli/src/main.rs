mod config;
mod error;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use runtime::{OpenAiGateway, Session, ToolHost};
use store::Catalog;

use config::Config;
use error::Result;

const CONFIG_FILE: &str = "goodfoods.toml";

const SYSTEM_PROMPT: &str = "\
You are a smart restaurant booking assistant for GoodFoods.
Your job is to help users find and book restaurants.

When presenting restaurant results, always format them clearly with:
- Restaurant name
- Cuisine type
- Location
- Rating
- Capacity
- Special tags

Behaviors to follow:
- Understand user intent from conversation history and use the correct tool.
- Don't hallucinate responses; call tools when you need information.
- Be polite, clear, and concise.
- If required arguments are missing, ask the user for them.
- Always show restaurant details when search results are returned.

Edge cases to handle:
- Unavailable restaurants or no matches: respond kindly and suggest alternative inputs.
- Missing dates, times, or names: ask for those explicitly.
- If the number of guests exceeds the restaurant's capacity, ask to try fewer guests or pick another place.

Examples:
User: I want to book a table for 4 in Koramangala
Tool: call search_restaurants(location=\"Koramangala\", num_guests=4)

User: Book Restaurant 2 for 2 people on 2024-08-15 at 19:00 under John
Tool: call make_reservation(restaurant_id=2, date=\"2024-08-15\", time=\"19:00\", num_guests=2, name=\"John\")

User: Cancel my reservation with ID BOOK1234
Tool: call cancel_reservation(booking_id=\"BOOK1234\")

If unsure, ask clarifying questions. Avoid assumptions.";

#[derive(Parser)]
#[command(name = "goodfoods")]
#[command(about = "A conversational restaurant reservation assistant", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session
    Chat,
    /// Show the top-rated restaurants without a model round-trip
    Top,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(&cli.config)?;

    match cli.command {
        Some(Commands::Chat) | None => cmd_chat(config).await,
        Some(Commands::Top) => cmd_top(config),
    }
}

async fn cmd_chat(config: Config) -> Result<()> {
    println!("goodfoods v{}", env!("CARGO_PKG_VERSION"));

    let catalog = Catalog::load(&config.catalog.path)?;
    println!("Catalog: {} restaurants from {}", catalog.len(), config.catalog.path);

    let mut gateway = OpenAiGateway::new(config.api_key());
    if let Some(api_url) = &config.gateway.api_url {
        gateway = gateway.with_api_url(api_url);
    }
    if let Some(model) = &config.gateway.model {
        gateway = gateway.with_model(model);
    }
    println!("Gateway: {gateway}");

    let mut session = Session::new(SYSTEM_PROMPT, ToolHost::new(catalog), gateway);
    println!("Session ID: {}", session.id);
    println!("Type '/reservations' to list bookings, 'quit' or Ctrl+D to exit.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "exit" {
            break;
        }
        if input == "/reservations" {
            print_reservations(&session);
            continue;
        }

        match session.chat(input).await {
            Ok(reply) => {
                println!("\n{reply}\n");
            }
            Err(e) => {
                eprintln!("Error: {e}\n");
            }
        }
    }

    println!("\nSession ended.");
    Ok(())
}

fn print_reservations<G: runtime::Gateway>(session: &Session<G>) {
    let reservations = session.reservations();
    if reservations.is_empty() {
        println!("No reservations yet.\n");
        return;
    }

    println!();
    for r in reservations.iter() {
        let restaurant = session
            .tools()
            .catalog()
            .get(r.restaurant_id)
            .map(|rec| rec.name.as_str())
            .unwrap_or("Unknown");
        println!(
            "{}  {}  {} at {}  {} guests  ({})",
            r.booking_id, restaurant, r.date, r.time, r.num_guests, r.name
        );
    }
    println!();
}

fn cmd_top(config: Config) -> Result<()> {
    let catalog = Catalog::load(&config.catalog.path)?;
    let host = ToolHost::new(catalog);

    println!("Top Rated Restaurants\n");
    for r in host.recommend() {
        println!("{} (ID: {})", r.name, r.id);
        println!("  {} cuisine", r.cuisine);
        println!("  {}", r.location);
        println!("  {:.1}/5.0", r.rating);
        println!("  Capacity: {} guests", r.capacity);
        if !r.tags.is_empty() {
            println!("  Tags: {}", r.tags.join(", "));
        }
        println!();
    }

    Ok(())
}
