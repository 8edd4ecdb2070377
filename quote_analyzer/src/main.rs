//! Quote Analyzer - command line front end
//!
//! Every subcommand loads the saved session, applies one action and saves the
//! result, so a sequence of invocations behaves like one interactive session.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use quote_analyzer::{
    export, share, KeywordClassifier, QuoteSession, RecordKey, SheetIngestor, StateStore,
};
use std::path::PathBuf;

/// Finds the lowest price per product in a supplier quote spreadsheet
#[derive(Parser, Debug)]
#[command(name = "quote_analyzer")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the saved session file
    #[arg(long, env = "QUOTE_ANALYZER_STATE", default_value_os_t = StateStore::default_path())]
    state: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a quote spreadsheet (.xlsx, .xls, .ods, .csv), replacing the current session
    Load {
        file: PathBuf,
        /// Extra header keyword marking a non-supplier column (repeatable)
        #[arg(long = "system-keyword")]
        system_keywords: Vec<String>,
    },
    /// Show every offer, cheapest first per product
    Show,
    /// Show session counters
    Stats,
    /// Show the products each supplier wins on price
    Lowest,
    /// Set the order quantity of an offer
    Quantity {
        product: String,
        supplier: String,
        quantity: u32,
    },
    /// Move a product's order to another supplier
    Reassign {
        product: String,
        from: String,
        to: String,
        /// Price for the target supplier when it has no offer for the product
        #[arg(long)]
        price: Option<f64>,
    },
    /// Remove an offer from the comparison
    Remove { product: String, supplier: String },
    /// Bring a removed offer back
    Restore { product: String, supplier: String },
    /// Discard every change since the spreadsheet was loaded
    Reset,
    /// Set (or clear, when omitted) the unit label of a product
    Unit {
        product: String,
        unit: Option<String>,
    },
    /// Mark a supplier's order as finished
    Finish {
        supplier: String,
        /// Mark the order as open again
        #[arg(long, default_value_t = false)]
        undo: bool,
    },
    /// Export the price grid as CSV
    Export { output: PathBuf },
    /// Print the order summary per supplier
    Share {
        #[arg(long)]
        supplier: Option<String>,
    },
    /// Delete the saved session
    Clear,
}

#[tokio::main]
async fn main() {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=quote_analyzer=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let store = StateStore::new(&args.state);
    log::debug!("State file: {}", store.path().display());

    if let Err(e) = run(args.command, &store).await {
        log::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(command: Command, store: &StateStore) -> Result<()> {
    match command {
        Command::Load {
            file,
            system_keywords,
        } => {
            let classifier = KeywordClassifier::new().with_system_keywords(system_keywords);
            let ingestion = SheetIngestor::with_classifier(classifier)
                .load_from_path(&file)
                .await
                .with_context(|| format!("Failed to process {}", file.display()))?;

            let session = QuoteSession::from_ingestion(ingestion);
            store.save(&session).context("Failed to save session")?;

            print_stats(&session);
            println!();
            print!("{}", share::format_lowest_prices(&session));
        }
        Command::Show => print_offers(&load_session(store)?),
        Command::Stats => print_stats(&load_session(store)?),
        Command::Lowest => print!("{}", share::format_lowest_prices(&load_session(store)?)),
        Command::Quantity {
            product,
            supplier,
            quantity,
        } => {
            let mut session = load_session(store)?;
            session.set_quantity(&RecordKey::new(product, supplier), quantity)?;
            store.save(&session)?;
        }
        Command::Reassign {
            product,
            from,
            to,
            price,
        } => {
            let mut session = load_session(store)?;
            session
                .reassign(&product, &from, &to, price.unwrap_or(f64::NAN))
                .with_context(|| {
                    format!("Cannot move '{product}' from '{from}' to '{to}' (use --price when '{to}' has no offer)")
                })?;
            store.save(&session)?;
        }
        Command::Remove { product, supplier } => {
            let mut session = load_session(store)?;
            session.remove(&RecordKey::new(product, supplier))?;
            store.save(&session)?;
        }
        Command::Restore { product, supplier } => {
            let mut session = load_session(store)?;
            session.restore(&RecordKey::new(product, supplier))?;
            store.save(&session)?;
        }
        Command::Reset => {
            let mut session = load_session(store)?;
            session.reset();
            store.save(&session)?;
        }
        Command::Unit { product, unit } => {
            let mut session = load_session(store)?;
            match unit {
                Some(unit) => session.set_unit(&product, &unit)?,
                None => session.clear_unit(&product)?,
            }
            store.save(&session)?;
        }
        Command::Finish { supplier, undo } => {
            let mut session = load_session(store)?;
            if undo {
                session.unmark_finished(&supplier)?;
            } else {
                session.mark_finished(&supplier)?;
            }
            store.save(&session)?;

            let status = if session.is_finished(&supplier) {
                "finished"
            } else {
                "open"
            };
            println!("{supplier}: {status}");
        }
        Command::Export { output } => {
            let session = load_session(store)?;
            export::export_to_path(&session, &output)
                .with_context(|| format!("Failed to export to {}", output.display()))?;
            println!("Exported to {}", output.display());
        }
        Command::Share { supplier } => {
            let session = load_session(store)?;
            let text = share::format_orders(&session, supplier.as_deref());
            if text.is_empty() {
                println!("No quantities entered yet.");
            } else {
                print!("{text}");
            }
        }
        Command::Clear => store.clear()?,
    }

    Ok(())
}

fn load_session(store: &StateStore) -> Result<QuoteSession> {
    store.load().ok_or_else(|| {
        anyhow!(
            "No quote loaded ({}). Run `quote_analyzer load <FILE>` first",
            store.path().display()
        )
    })
}

fn print_stats(session: &QuoteSession) {
    let stats = session.stats();
    println!("Products:           {}", stats.products);
    println!("Suppliers:          {}", stats.suppliers);
    println!(
        "Offers:             {} (loaded {})",
        stats.offers,
        session.original().len()
    );
    println!("Lowest prices:      {}", stats.lowest_prices);
    println!("Winning suppliers:  {}", stats.suppliers_with_lowest);
    println!("Removed offers:     {}", stats.removed);
    println!("Order total:        {}", share::format_brl(stats.order_total));
}

fn print_offers(session: &QuoteSession) {
    for product in session.products() {
        let unit = session
            .unit(product)
            .map(|unit| format!(" ({unit})"))
            .unwrap_or_default();
        println!("{product}{unit}");

        for record in session.offers_for(product) {
            let marker = if session.is_lowest(&record.key()) {
                "  <- menor preço"
            } else {
                ""
            };
            println!(
                "    {:<24} {:>14}  qtd {:>4}  total {:>14}{marker}",
                record.supplier,
                share::format_brl(record.price),
                record.quantity,
                share::format_brl(record.total_price()),
            );
        }
    }

    if !session.removed().is_empty() {
        println!();
        println!("Removed:");
        for entry in session.removed() {
            println!(
                "    {} / {} ({}, removed {})",
                entry.record.product,
                entry.record.supplier,
                share::format_brl(entry.record.price),
                entry.removed_at.format("%Y-%m-%d %H:%M")
            );
        }
    }

    let finished: Vec<&str> = session.finished_suppliers().collect();
    if !finished.is_empty() {
        println!();
        println!("Finished suppliers: {}", finished.join(", "));
    }
}
