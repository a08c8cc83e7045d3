//! OrderTalk - voice-order interpretation for a drive-thru menu
//!
//! REPL binary: type ordering requests line by line and watch the order
//! mutate. The transcription layer that would normally feed this engine is
//! out of scope; typed text exercises the same path.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ordertalk::config::Config;
use ordertalk::list::ListKeeper;
use ordertalk::mutator::Action;
use ordertalk::processor::OrderProcessor;
use ordertalk::store::InMemoryOrderStore;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file with menu and topping policy (defaults apply if absent)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Catalog-free list mode instead of the menu-backed order
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("OrderTalk v{} starting...", env!("CARGO_PKG_VERSION"));

    if args.list {
        return run_list_mode();
    }

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut processor = OrderProcessor::with_policy(
        Box::new(InMemoryOrderStore::new()),
        Box::new(config.catalog()),
        &config.policy(),
    );

    info!("Ready - type an order request");
    info!("   Try: 'add number two with cheddar', 'add a large lemonade', 'clear order'");

    let stdin = std::io::stdin();
    prompt()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            prompt()?;
            continue;
        }
        if text == "quit" || text == "exit" {
            break;
        }

        let outcome = processor.process_command(text);
        println!("action: {:?}", outcome.action);
        if outcome.items.is_empty() {
            println!("(order is empty)");
        }
        for item in &outcome.items {
            let size = item.size.map_or(String::new(), |s| format!("{} ", s.as_str()));
            let mods = describe_mods(&item.add, &item.remove);
            println!(
                "  {} x {}{} @ {:.2}{}",
                item.quantity, size, item.name, item.price, mods
            );
        }
        prompt()?;
    }

    Ok(())
}

fn run_list_mode() -> Result<()> {
    let mut list = ListKeeper::new();
    info!("List mode - try 'add six eggs', 'remove two eggs', 'clear list'");

    let stdin = std::io::stdin();
    prompt()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            prompt()?;
            continue;
        }
        if text == "quit" || text == "exit" {
            break;
        }

        let outcome = list.process_command(text);
        if outcome.action == Action::Noop {
            println!("(not recognized)");
        }
        if outcome.items.is_empty() {
            println!("(list is empty)");
        }
        for item in &outcome.items {
            println!("  {}", item);
        }
        prompt()?;
    }

    Ok(())
}

fn describe_mods(add: &[String], remove: &[String]) -> String {
    let mut out = String::new();
    if !add.is_empty() {
        out.push_str(&format!("  with {}", add.join(", ")));
    }
    if !remove.is_empty() {
        out.push_str(&format!("  without {}", remove.join(", ")));
    }
    out
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}
