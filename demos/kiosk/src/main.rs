//! Terminal kiosk: a minimal walk through the Cropcase client.
//!
//! Points at a running storefront backend, lists the catalog, and (when
//! credentials are provided) opens the first case the balance can cover.
//!
//! Environment:
//! - `CROPCASE_API`  — base URL (default `http://localhost:8000/api`)
//! - `CROPCASE_USER` / `CROPCASE_PASS` — login credentials (optional;
//!   anonymous runs just browse the catalog)
//! - `RUST_LOG` — e.g. `cropcase_session=debug` for the refresh protocol

use std::time::Duration;

use cropcase::prelude::*;

#[tokio::main]
async fn main() -> Result<(), StorefrontError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let base_url = std::env::var("CROPCASE_API")
        .unwrap_or_else(|_| "http://localhost:8000/api".to_string());

    let store = Storefront::builder()
        .base_url(&base_url)
        .timeout(Duration::from_secs(10))
        .build()?;

    // A persisted session survives restarts; only log in when we have to.
    match store.session() {
        Some(view) => println!(
            "restored session for {} (balance: {} coins)",
            view.user().username,
            view.balance()
        ),
        None => {
            if let (Ok(user), Ok(pass)) = (
                std::env::var("CROPCASE_USER"),
                std::env::var("CROPCASE_PASS"),
            ) {
                let view = store.login(&user, &pass).await?;
                println!(
                    "logged in as {} (balance: {} coins)",
                    view.user().username,
                    view.balance()
                );
            } else {
                println!("no credentials set, browsing anonymously");
            }
        }
    }

    let cases = store.cases().await?;
    println!("\n{} cases on offer:", cases.len());
    for case in &cases {
        println!(
            "  [{}] {}: {} coins, {} possible rewards",
            case.id, case.name, case.price, case.vegetables.len()
        );
    }

    let Some(balance) = store.balance() else {
        return Ok(());
    };

    let Some(affordable) = cases.iter().find(|c| c.price <= balance) else {
        println!("\nbalance of {balance} coins covers none of these cases");
        return Ok(());
    };

    println!("\nopening {} for {} coins...", affordable.name, affordable.price);
    match store.open_case(affordable).await {
        Ok(settled) => {
            print_reveal(&settled.sequence);
            let won = settled.sequence.revealed();
            println!(
                "{} you won {} {} ({}) worth {} coins",
                settled.result.message, won.emoji, won.name, won.rarity_display, won.price
            );
            println!(
                "balance: {} coins",
                store.balance().expect("still logged in")
            );
        }
        Err(e) => println!("open failed: {e}"),
    }

    let inventory = store.inventory().await?;
    println!("\ninventory ({} stacks):", inventory.len());
    for entry in &inventory {
        println!(
            "  [{}] {} {} x{} (sells for {} each)",
            entry.id, entry.item.emoji, entry.item.name, entry.quantity, entry.item.price
        );
    }

    Ok(())
}

/// Prints the slots around the reveal marker, kiosk style.
fn print_reveal(sequence: &RevealSequence) {
    let slot = sequence.reveal_slot();
    let from = slot.saturating_sub(3);
    let to = (slot + 4).min(sequence.len());
    let mut line = String::from("  ");
    for (i, item) in sequence.items()[from..to].iter().enumerate() {
        if from + i == slot {
            line.push_str(&format!("[{}] ", item.emoji));
        } else {
            line.push_str(&format!(" {}  ", item.emoji));
        }
    }
    println!("{line}");
}
