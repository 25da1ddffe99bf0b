//! Lookup command implementation

use super::{describe, stars};
use anyhow::{Context, Result};
use bookcase_core::{Book, BookLookup, Catalog, LookupConfig, LookupError, LookupService};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tokio::sync::oneshot;

/// Options for a lookup run
pub struct LookupRequest {
    pub identifier: String,
    pub save: bool,
    pub rating: u8,
    pub json: bool,
    pub config: LookupConfig,
}

/// JSON output of a lookup
#[derive(Serialize)]
struct LookupReport<'a> {
    identifier: &'a str,
    found: bool,
    title: Option<&'a str>,
    author: Option<&'a str>,
    cover_bytes: Option<usize>,
    error: Option<String>,
    saved: bool,
}

/// Look up `identifier` remotely and optionally save the result
pub async fn lookup(data_dir: &Path, request: LookupRequest) -> Result<()> {
    let service = LookupService::new(&request.config).context("Invalid lookup configuration")?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Looking up {}...", request.identifier));

    let (tx, mut rx) = oneshot::channel();
    service.lookup(
        &request.identifier,
        Box::new(move |outcome| {
            let _ = tx.send(outcome);
        }),
    );

    // Ctrl-C cancels the lookup; the callback still reports what was fetched
    let finished = tokio::select! {
        outcome = &mut rx => Some(outcome),
        _ = tokio::signal::ctrl_c() => None,
    };
    let outcome = match finished {
        Some(outcome) => outcome,
        None => {
            pb.set_message("Cancelling...");
            service.cancel();
            rx.await
        }
    }
    .context("Lookup task ended without reporting")?;

    pb.finish_and_clear();

    if outcome.is_not_found() {
        if request.json {
            print_report(&request.identifier, None, None, false)?;
        } else {
            println!("No book found for {}", request.identifier);
        }
        return Ok(());
    }

    let (book, error) = outcome.into_parts();
    let Some(mut book) = book else {
        // Failed always carries an error
        let error = error.context("Lookup failed")?;
        return Err(error).with_context(|| format!("Lookup of {} failed", request.identifier));
    };

    if let Some(e) = &error {
        tracing::warn!("Cover download failed: {}", e);
    }

    book.isbn = request.identifier.clone();
    book = book.with_rating(request.rating);

    if request.json {
        print_report(&request.identifier, Some(&book), error.as_ref(), request.save)?;
    } else {
        println!("Found {}", describe(&book));
        println!("  Rating: {}", stars(book.rating));
        match (&book.cover, &error) {
            (Some(cover), _) => println!("  Cover:  {} ({} bytes)", cover.mime_type(), cover.len()),
            (None, Some(e)) => println!("  Cover:  unavailable ({})", e),
            (None, None) => println!("  Cover:  none"),
        }
    }

    if request.save {
        let description = describe(&book);
        let mut catalog = Catalog::open(data_dir);
        catalog.add(book);
        if !request.json {
            println!("Saved {}", description);
        }
    }

    Ok(())
}

fn print_report(
    identifier: &str,
    book: Option<&Book>,
    error: Option<&LookupError>,
    saved: bool,
) -> Result<()> {
    let report = LookupReport {
        identifier,
        found: book.is_some(),
        title: book.map(|b| b.title.as_str()),
        author: book.map(|b| b.author.as_str()),
        cover_bytes: book.and_then(|b| b.cover.as_ref()).map(|c| c.len()),
        error: error.map(|e| e.to_string()),
        saved,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
