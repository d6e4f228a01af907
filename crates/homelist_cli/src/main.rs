//! homelist CLI.
//!
//! # Responsibility
//! - Drive the checklist core from a terminal against the same SQLite file
//!   the app uses.
//! - Keep output line-oriented so it can be piped or diffed.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use homelist_core::db::open_db;
use homelist_core::derive::{
    activity_feed, category_progress, dashboard_stats, format_clp, parse_price_input,
    share_text, visible_items, ItemFilter, StatusFilter,
};
use homelist_core::{
    accept_suggestions, init_logging_from_config, migrate_legacy_documents, AppConfig,
    BudgetService, CatalogSuggestionProvider, Category, Item, ItemId, ItemListQuery, ItemPatch,
    ItemService, NewItem, Relevance, SqliteItemRepository, SqliteMetadataRepository,
    SuggestionService, User,
};
use log::info;
use rusqlite::Connection;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "homelist")]
#[command(about = "Shared household furnishing checklist")]
struct Cli {
    /// SQLite file (defaults to HOMELIST_DB_PATH or the temp dir)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Household member performing the action
    #[arg(short, long, global = true, default_value = "Felipe")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List items, pending first
    List {
        /// Category storage value or key (e.g. `Cocina`, `kitchen`)
        #[arg(short, long)]
        category: Option<String>,

        /// Relevance filter; repeat to allow several
        #[arg(short, long)]
        relevance: Vec<String>,

        /// Case-insensitive name substring
        #[arg(short, long, default_value = "")]
        search: String,

        /// all, pending or completed
        #[arg(long, default_value = "all")]
        status: String,

        /// Include soft-deleted items
        #[arg(long)]
        deleted: bool,
    },
    /// Add an item
    Add {
        name: String,

        #[arg(short, long)]
        category: String,

        #[arg(short, long, default_value = "Media")]
        relevance: String,

        /// Unit price, free text accepted (`$24.990`)
        #[arg(short, long, default_value = "0")]
        price: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Mark units as purchased
    Complete {
        id: String,

        /// Purchased units (defaults to all)
        #[arg(short, long)]
        quantity: Option<u32>,

        /// Record the paid unit price and complete every unit
        #[arg(short, long, conflicts_with = "quantity")]
        price: Option<String>,
    },
    /// Flip between fully purchased and not purchased
    Toggle { id: String },
    /// Edit item fields
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        relevance: Option<String>,

        #[arg(long)]
        price: Option<String>,

        #[arg(long)]
        quantity: Option<u32>,

        /// Reassign who added the item
        #[arg(long)]
        added_by: Option<String>,

        /// Reassign who completed the item
        #[arg(long)]
        completed_by: Option<String>,
    },
    /// Soft-delete one or more items
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show or set the household budget
    Budget {
        /// New budget in CLP
        value: Option<i64>,
    },
    /// Progress and budget figures
    Stats,
    /// Purchased units per space
    Progress,
    /// Recent additions, purchases and deletions
    Activity {
        #[arg(short, long, default_value_t = homelist_core::derive::DEFAULT_ACTIVITY_LIMIT)]
        limit: usize,
    },
    /// Print the pending list for messaging apps
    Share,
    /// Insert the starter catalog into an empty checklist
    Seed,
    /// Import a JSON export of legacy item documents
    ImportLegacy {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
    /// Suggest items for a space from the offline catalog
    Suggest {
        category: String,

        /// Add every suggestion to the checklist
        #[arg(long)]
        accept: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    init_logging_from_config(&config).map_err(anyhow::Error::msg)?;

    let conn = open_db(&config.db_path)
        .with_context(|| format!("opening {}", config.db_path.display()))?;
    let actor: User = cli.user.parse()?;
    info!(
        "event=cli_start module=cli status=ok db={} actor={}",
        config.db_path.display(),
        actor
    );

    run(&conn, actor, cli.command)
}

fn run(conn: &Connection, actor: User, command: Commands) -> anyhow::Result<()> {
    let items = ItemService::new(SqliteItemRepository::try_new(conn)?);

    match command {
        Commands::List {
            category,
            relevance,
            search,
            status,
            deleted,
        } => {
            let filter = ItemFilter {
                category: category.as_deref().map(str::parse::<Category>).transpose()?,
                relevances: relevance
                    .iter()
                    .map(|raw| raw.parse::<Relevance>())
                    .collect::<Result<Vec<_>, _>>()?,
                search,
                status: parse_status(&status)?,
            };
            let listed = visible_items(&items.list_all()?, &filter);
            for item in &listed {
                println!("{}", item_line(item));
            }
            if deleted {
                let tombstones = items.list_items(&ItemListQuery {
                    include_deleted: true,
                    ..ItemListQuery::default()
                })?;
                for item in tombstones.iter().filter(|item| item.is_deleted) {
                    println!("{}  (eliminado)", item_line(item));
                }
            }
        }
        Commands::Add {
            name,
            category,
            relevance,
            price,
            quantity,
        } => {
            let new_item = NewItem {
                quantity,
                ..NewItem::new(
                    name,
                    category.parse()?,
                    relevance.parse()?,
                    parse_price(&price)?,
                )
            };
            let item = items.add_item(new_item, actor)?;
            println!("{}", item.id);
        }
        Commands::Complete {
            id,
            quantity,
            price,
        } => {
            let id = parse_id(&id)?;
            let item = match (quantity, price) {
                (_, Some(price)) => items.complete_with_price(id, parse_price(&price)?, actor)?,
                (Some(quantity), None) => items.update_completion(id, quantity, actor)?,
                (None, None) => {
                    let Some(current) = items.get_item(id, false)? else {
                        bail!("item {id} not found");
                    };
                    items.update_completion(id, current.quantity, actor)?
                }
            };
            println!("{}", item_line(&item));
        }
        Commands::Toggle { id } => {
            let item = items.toggle_complete(parse_id(&id)?, actor)?;
            println!("{}", item_line(&item));
        }
        Commands::Edit {
            id,
            name,
            category,
            relevance,
            price,
            quantity,
            added_by,
            completed_by,
        } => {
            let patch = ItemPatch {
                name,
                category: category.as_deref().map(str::parse::<Category>).transpose()?,
                relevance: relevance.as_deref().map(str::parse::<Relevance>).transpose()?,
                price: price.as_deref().map(parse_price).transpose()?,
                quantity,
                added_by: added_by.as_deref().map(str::parse::<User>).transpose()?,
                completed_by: completed_by.as_deref().map(str::parse::<User>).transpose()?,
            };
            let item = items.edit_item(parse_id(&id)?, patch)?;
            println!("{}", item_line(&item));
        }
        Commands::Delete { ids } => {
            let ids = ids
                .iter()
                .map(|raw| parse_id(raw))
                .collect::<anyhow::Result<Vec<_>>>()?;
            items.delete_items(&ids, actor)?;
            println!("deleted {}", ids.len());
        }
        Commands::Budget { value } => {
            let budget = BudgetService::new(SqliteMetadataRepository::try_new(conn)?);
            let current = match value {
                Some(value) => budget.set_budget(value)?,
                None => budget.budget()?,
            };
            println!("{}", format_clp(current));
        }
        Commands::Stats => {
            let budget = BudgetService::new(SqliteMetadataRepository::try_new(conn)?).budget()?;
            let stats = dashboard_stats(&items.list_visible()?, budget);
            println!(
                "progreso   {}/{} ({}%)",
                stats.progress.completed,
                stats.progress.total,
                stats.progress.percent()
            );
            println!("presupuesto {}", format_clp(stats.budget.total));
            println!("gastado     {}", format_clp(stats.budget.spent));
            println!("restante    {}", format_clp(stats.budget.remaining));
            for entry in &stats.relevance {
                println!(
                    "{:<6} {}/{} ({}%)",
                    entry.relevance.as_str(),
                    entry.progress.completed,
                    entry.progress.total,
                    entry.progress.percent()
                );
            }
        }
        Commands::Progress => {
            for entry in category_progress(&items.list_visible()?) {
                println!(
                    "{:<14} {}/{} ({}%)",
                    entry.category.label(),
                    entry.units.completed,
                    entry.units.total,
                    entry.units.percent()
                );
            }
        }
        Commands::Activity { limit } => {
            let now = homelist_core::clock::now_epoch_ms();
            for event in activity_feed(&items.list_all()?, limit) {
                println!("{}", event.describe(now));
            }
        }
        Commands::Share => {
            println!("{}", share_text(&items.list_visible()?));
        }
        Commands::Seed => {
            let metadata = SqliteMetadataRepository::try_new(conn)?;
            let inserted = items.seed_if_empty(&metadata, actor)?;
            println!("seeded {inserted}");
        }
        Commands::ImportLegacy { path } => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let report = migrate_legacy_documents(conn, &json, actor)?;
            if report.skipped_marker {
                println!("legacy import already done");
            } else {
                println!(
                    "imported={} converted={} already_present={}",
                    report.imported, report.converted, report.already_present
                );
            }
        }
        Commands::Suggest { category, accept } => {
            let category: Category = category.parse()?;
            let provider = CatalogSuggestionProvider::excluding_items(&items.list_visible()?);
            let suggestions = SuggestionService::new(provider).suggest(category)?;
            for suggestion in &suggestions {
                println!(
                    "{} · {} · {}",
                    suggestion.name,
                    suggestion.relevance.as_str(),
                    format_clp(suggestion.price)
                );
            }
            if accept {
                let added = accept_suggestions(&items, &suggestions, actor)?;
                println!("added {added}");
            }
        }
    }

    Ok(())
}

fn item_line(item: &Item) -> String {
    let mark = if item.is_completed() { "x" } else { " " };
    format!(
        "[{mark}] {}/{} {} · {} · {} · {}  {}",
        item.completed_quantity,
        item.quantity,
        item.name,
        item.category.label(),
        item.relevance.as_str(),
        format_clp(item.price),
        item.id
    )
}

fn parse_id(raw: &str) -> anyhow::Result<ItemId> {
    raw.trim()
        .parse::<ItemId>()
        .with_context(|| format!("invalid item id `{raw}`"))
}

fn parse_price(raw: &str) -> anyhow::Result<i64> {
    match parse_price_input(raw) {
        Some(price) => Ok(price),
        None => bail!("invalid price `{raw}`"),
    }
}

fn parse_status(raw: &str) -> anyhow::Result<StatusFilter> {
    match StatusFilter::parse(raw) {
        Some(status) => Ok(status),
        None => bail!("unknown status `{raw}`; expected all, pending or completed"),
    }
}
