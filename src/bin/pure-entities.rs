use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use tdoc::{Document, markdown, parse};
use tracing_subscriber::EnvFilter;

use pure_entities::{
    BlockKey, ContentBlock, ContentState, ImportOptions, Mutability, SelectionState,
    content::inline_style_label, remove_entities_at_edges,
};

const USAGE: &str = "Usage: pure-entities <file.ftml|file.md> [--block N] [--start OFFSET] \
                     [--end OFFSET] [--immutable-links] [--verbose]";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DocumentFormat {
    Ftml,
    Markdown,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("md") | Some("markdown") | Some("mkd") | Some("mdown") | Some("mdtxt") => {
                DocumentFormat::Markdown
            }
            _ => DocumentFormat::Ftml,
        }
    }
}

#[derive(Debug)]
struct Args {
    path: PathBuf,
    block: usize,
    start: usize,
    end: Option<usize>,
    immutable_links: bool,
    verbose: bool,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Option<Self>> {
        let mut path = None;
        let mut block = 0;
        let mut start = 0;
        let mut end = None;
        let mut immutable_links = false;
        let mut verbose = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--block" => block = numeric_value(&mut args, "--block")?,
                "--start" => start = numeric_value(&mut args, "--start")?,
                "--end" => end = Some(numeric_value(&mut args, "--end")?),
                "--immutable-links" => immutable_links = true,
                "--verbose" | "-v" => verbose = true,
                "--help" | "-h" => return Ok(None),
                other if other.starts_with('-') => bail!("unknown option {other}"),
                other => {
                    if path.replace(PathBuf::from(other)).is_some() {
                        bail!("only one document can be given");
                    }
                }
            }
        }

        let Some(path) = path else {
            return Ok(None);
        };
        Ok(Some(Self {
            path,
            block,
            start,
            end,
            immutable_links,
            verbose,
        }))
    }
}

fn numeric_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<usize> {
    let value = args
        .next()
        .ok_or_else(|| anyhow!("{flag} expects a value"))?;
    value
        .parse()
        .with_context(|| format!("{flag} expects a number, got {value:?}"))
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let Some(args) = Args::parse(env::args().skip(1))? else {
        eprintln!("{USAGE}");
        return Ok(());
    };
    setup_tracing(args.verbose);

    let document = load_document(&args.path)?;
    let mut options = ImportOptions::default();
    if args.immutable_links {
        options = options.with_link_mutability(Mutability::Immutable);
    }
    let content = ContentState::from_document(&document, &options)
        .with_context(|| format!("failed to import {}", args.path.display()))?;

    let key = content
        .block_keys()
        .nth(args.block)
        .cloned()
        .ok_or_else(|| {
            anyhow!(
                "block {} does not exist, the document has {} blocks",
                args.block,
                content.block_count()
            )
        })?;
    let selection = SelectionState::new(
        key.clone(),
        args.start,
        key.clone(),
        args.end.unwrap_or(args.start),
    );

    let trimmed = remove_entities_at_edges(&content, &selection)
        .context("failed to trim entities at selection edges")?;

    println!("Before:");
    print_block(&content, &key)?;
    println!("After:");
    print_block(&trimmed, &key)?;
    if trimmed.shares_block_map_with(&content) {
        println!("No entity was trimmed.");
    }
    Ok(())
}

fn setup_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("pure_entities=debug,info")
        } else {
            EnvFilter::new("info")
        }
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_document(path: &Path) -> Result<Document> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let parsed = match DocumentFormat::from_path(path) {
        DocumentFormat::Ftml => parse(std::io::Cursor::new(content))
            .map_err(|err| -> Box<dyn std::error::Error + Send + Sync> { Box::new(err) }),
        DocumentFormat::Markdown => markdown::parse(std::io::Cursor::new(content)),
    };
    parsed.map_err(|err| anyhow!("failed to parse {}: {err}", path.display()))
}

fn print_block(content: &ContentState, key: &BlockKey) -> Result<()> {
    let block = content.block_for_key(key)?;
    println!("  [{}] {}", block.key(), block.text());

    let mut runs = Vec::new();
    block.find_entity_ranges(
        |character| character.entity().is_some(),
        |start, end| runs.push((start, end)),
    );
    for (start, end) in runs {
        let Some(entity_key) = block.entity_at(start) else {
            continue;
        };
        let entity = content.entity(entity_key)?;
        println!(
            "    {start}..{end} {} #{entity_key} ({}) {:?}",
            entity.entity_type(),
            entity.mutability(),
            slice_chars(block, start, end),
        );
    }

    let mut styled = Vec::new();
    block.find_style_ranges(
        |character| !character.styles().is_empty(),
        |start, end| styled.push((start, end)),
    );
    for (start, end) in styled {
        let labels: Vec<&str> = block
            .inline_styles_at(start)
            .iter()
            .filter_map(|style| inline_style_label(*style))
            .collect();
        println!("    {start}..{end} {}", labels.join("+"));
    }
    Ok(())
}

fn slice_chars(block: &ContentBlock, start: usize, end: usize) -> String {
    block.text().chars().skip(start).take(end - start).collect()
}
