//! `sb-export`: turn saved scrapbooks into shareable files without a browser.
//!
//! The input is what the editor persists: either one scrapbook object or the
//! whole shelf (an array), in which case `--id` or `--title` picks the book.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use sb_core::model::Scrapbook;
use sb_render::{ExportOptions, RenderContext, document_filename, page_html, standalone_html};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "sb-export", version, about = "Export saved scrapbooks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a self-contained HTML flip-book.
    Html {
        #[command(flatten)]
        source: Source,
        /// JSON file with export options (lang, colours, connections).
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output path. Defaults to the scrapbook's document filename.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print one page as a static HTML fragment.
    Page {
        #[command(flatten)]
        source: Source,
        /// Zero-based page index.
        #[arg(short, long, default_value_t = 0)]
        page: usize,
    },
    /// List the scrapbooks in a shelf file.
    List {
        input: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct Source {
    /// Scrapbook or shelf JSON.
    input: PathBuf,
    /// Pick a book from a shelf by id.
    #[arg(long, conflicts_with = "title")]
    id: Option<u64>,
    /// Pick a book from a shelf by title.
    #[arg(long)]
    title: Option<String>,
}

fn read_books(path: &Path) -> Result<Vec<Scrapbook>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: Value = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    let books = match value {
        Value::Array(_) => serde_json::from_value(value)?,
        other => vec![serde_json::from_value(other)?],
    };
    log::debug!("loaded {} scrapbook(s) from {}", books.len(), path.display());
    Ok(books)
}

fn select(books: Vec<Scrapbook>, id: Option<u64>, title: Option<&str>) -> Result<Scrapbook> {
    if let Some(id) = id {
        return books
            .into_iter()
            .find(|b| b.id == id)
            .with_context(|| format!("no scrapbook with id {id}"));
    }
    if let Some(title) = title {
        return books
            .into_iter()
            .find(|b| b.title == title)
            .with_context(|| format!("no scrapbook titled {title:?}"));
    }
    match <[Scrapbook; 1]>::try_from(books) {
        Ok([book]) => Ok(book),
        Err(books) if books.is_empty() => bail!("the input holds no scrapbooks"),
        Err(books) => bail!("the input holds {} scrapbooks; pick one with --id or --title", books.len()),
    }
}

fn load(source: &Source) -> Result<Scrapbook> {
    select(read_books(&source.input)?, source.id, source.title.as_deref())
}

fn read_options(path: Option<&Path>) -> Result<ExportOptions> {
    let Some(path) = path else {
        return Ok(ExportOptions::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing export options in {}", path.display()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Html {
            source,
            config,
            output,
        } => {
            let book = load(&source)?;
            let options = read_options(config.as_deref())?;
            let html = standalone_html(&book, &options)?;
            let output = output.unwrap_or_else(|| PathBuf::from(document_filename(&book)));
            fs::write(&output, html).with_context(|| format!("writing {}", output.display()))?;
            log::info!("exported {:?} ({} pages) to {}", book.title, book.page_count(), output.display());
        }
        Command::Page { source, page } => {
            let book = load(&source)?;
            let Some(p) = book.page(page) else {
                bail!("page {page} is out of range ({} pages)", book.page_count());
            };
            println!("{}", page_html(p, RenderContext::Static));
        }
        Command::List { input } => {
            for book in read_books(&input)? {
                println!("{}\t{}\t{} pages", book.id, book.display_title(), book.page_count());
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run(Cli::parse())
}
