// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use town_square::{
    explain, Business, BusinessQuery, Category, Config, Database, ParseCategoryError, SortOrder,
    ALL_CATEGORIES,
};

/// A category argument where `All` means no filter
type CategoryFilter = Option<Category>;

fn parse_category(value: &str) -> std::result::Result<CategoryFilter, ParseCategoryError> {
    Category::parse_filter(value)
}

#[derive(Parser, Debug)]
#[command(name = "town-square")]
#[command(version)]
#[command(about = "Town Square - a local-first directory of neighborhood businesses")]
#[command(long_about = r#"
Town Square keeps a directory of local businesses, their deals and reviews.
Run without a command to open the interactive directory.

Set TOWN_SQUARE_DB to choose the database file.

Example usage:
  town-square list Food --rating
  town-square recommend Retail
  town-square report --json
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the database and seed starter businesses
    Init,

    /// List businesses
    List {
        /// Food, Retail, Services, or All
        #[arg(default_value = ALL_CATEGORIES, value_parser = parse_category)]
        category: CategoryFilter,

        /// Sort by rating instead of name
        #[arg(long)]
        rating: bool,

        /// Only favorited businesses
        #[arg(long)]
        favorites: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Community snapshot: totals, average rating, and the top three
    Report {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Ranked suggestions, favorites first
    Recommend {
        /// Preferred category: Food, Retail, Services, or All
        #[arg(default_value = ALL_CATEGORIES, value_parser = parse_category)]
        category: CategoryFilter,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the interactive screen quiet unless RUST_LOG asks otherwise
    init_logging(if cli.command.is_none() { "warn" } else { "info" });

    let config = Config::from_env();
    let context = || {
        format!(
            "Town Square could not initialize its local database at {}",
            config.db_path.display()
        )
    };
    let db = Database::open(&config.db_path).with_context(context)?;
    let seeded = db.initialize().with_context(context)?;

    match cli.command {
        None => run_ui_mode(db),
        Some(Commands::Init) => {
            println!("✓ Database ready at {}", db.path().display());
            if seeded > 0 {
                println!("  Added {} starter businesses", seeded);
            }
            Ok(())
        }
        Some(Commands::List {
            category,
            rating,
            favorites,
            json,
        }) => {
            let sort = if rating { SortOrder::RatingDesc } else { SortOrder::Name };
            let query = BusinessQuery::default()
                .category(category)
                .sort(sort)
                .favorites_only(favorites);
            run_list(&db, &query, json)
        }
        Some(Commands::Report { json }) => run_report(&db, json),
        Some(Commands::Recommend { category, json }) => run_recommend(&db, category, json),
    }
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run_list(db: &Database, query: &BusinessQuery, json: bool) -> Result<()> {
    let businesses = db.list_businesses(query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&businesses)?);
    } else if businesses.is_empty() {
        println!("No businesses match.");
    } else {
        print_businesses(&businesses);
    }
    Ok(())
}

fn run_report(db: &Database, json: bool) -> Result<()> {
    let summary = db.get_summary()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("📊 Community Snapshot");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Total businesses:                 {}", summary.total_businesses);
    println!("Average rating (with reviews):    {:.2}", summary.average_rating);
    println!("Favorited businesses:             {}", summary.favorite_count);
    println!();

    if summary.top_businesses.is_empty() {
        println!("No businesses have been reviewed yet.");
    } else {
        println!("Top rated:");
        for (rank, business) in summary.top_businesses.iter().enumerate() {
            println!(
                "  {}. {:<28} {:<9} {:.2} ({})",
                rank + 1,
                business.name,
                business.category,
                business.average_rating,
                business.review_count
            );
        }
    }
    Ok(())
}

fn run_recommend(db: &Database, category: CategoryFilter, json: bool) -> Result<()> {
    let businesses = db.recommend(category)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&businesses)?);
        return Ok(());
    }

    for (rank, business) in businesses.iter().enumerate() {
        println!(
            "{:>2}. {:<28} {:<9} {}",
            rank + 1,
            business.name,
            business.category,
            explain(business)
        );
    }
    Ok(())
}

fn print_businesses(businesses: &[Business]) {
    println!(
        "{:<3} {:<28} {:<9} {:<16} {}",
        "", "Name", "Category", "Rating", "Deal"
    );
    for business in businesses {
        println!(
            "{:<3} {:<28} {:<9} {:<16} {}",
            if business.is_favorite { "★" } else { "" },
            business.name,
            business.category.as_str(),
            business.rating_display(),
            business.deal_text
        );
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(db: Database) -> Result<()> {
    let mut app = ui::App::new(db)?;
    ui::run_ui(&mut app)?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_db: Database) -> Result<()> {
    eprintln!("❌ Interactive mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use a command mode: town-square report");
    std::process::exit(1);
}
