use clap::Parser;
use css_inliner::{CssSource, Inliner, InlinerOptions};
use log::info;
use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Inlines the rules of stylesheets into the style attributes of an HTML document.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Stylesheet to inline. Repeatable; rules of earlier files win over
    /// equivalent rules of later ones.
    #[arg(long = "css", value_name = "FILE", required = true)]
    css: Vec<PathBuf>,

    /// Attribute to remove from every element after inlining. Repeatable;
    /// `class` and `id` are removed when none is given.
    #[arg(long = "strip", value_name = "ATTRIBUTE")]
    strip: Vec<String>,

    /// Keep every attribute.
    #[arg(long, conflicts_with = "strip")]
    keep_attributes: bool,

    /// HTML document, read from stdin when omitted.
    html: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    flexi_logger::Logger::with_env_or_str("info").start()?;

    let args = Args::parse();
    let start_instant = Instant::now();

    let mut source = CssSource::default();
    for path in &args.css {
        source = source.merge(&CssSource::from_file(path)?);
    }

    let mut options = InlinerOptions::default();
    if args.keep_attributes {
        options = options.keep_attributes();
    } else if !args.strip.is_empty() {
        options = options.strip_attributes(args.strip);
    }

    let html = match &args.html {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut html = String::new();
            io::stdin().read_to_string(&mut html)?;
            html
        }
    };

    let inlined = Inliner::new(options)?.inline_css(&html, source.rule_sets())?;
    io::stdout().write_all(inlined.as_bytes())?;

    info!(
        "Inlined {} rule sets in {:.2?}.",
        source.len(),
        start_instant.elapsed()
    );

    Ok(())
}
