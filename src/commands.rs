use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};

use crate::apply::{self, ApplyError};
use crate::cli::{ApplyArgs, BackgroundArgs, Commands, PreviewArgs, RunArgs};
use crate::compose::{self, RenderRequest};
use crate::config::{self, QuotewallConfig};
use crate::display;
use crate::paths;
use crate::quotes::{QuoteCatalog, QuoteSet};
use crate::store;

pub async fn handle_command(command: Commands, debug: bool) -> Result<()> {
    match command {
        Commands::Run(args) => run(args, debug).await,
        Commands::Preview(args) => preview(args, debug),
        Commands::Apply(args) => apply_existing(args, debug).await,
        Commands::Displays => list_displays(debug),
        Commands::Background(args) => set_background(args),
    }
}

async fn run(args: RunArgs, debug: bool) -> Result<()> {
    println!("{}", "Changing wallpaper...".cyan());

    let config = QuotewallConfig::load()?;
    let catalog = load_catalog(args.quotes.as_deref())?;
    let displays = display::enumerate_displays(debug);

    println!("\nDetected {} display(s):", displays.len());
    for d in &displays {
        println!("  Display {}: {} ({}x{})", d.index, d.name, d.width, d.height);
    }

    let selected = catalog.pick(displays.len())?;
    let dir = paths::wallpaper_dir()?;

    let mut generated: Vec<(usize, PathBuf)> = Vec::new();
    for (display, quote_set) in displays.iter().zip(selected.iter().copied()) {
        println!("\n--- Display {} ({}) ---", display.index, display.name);
        for quote in quote_set.quotes() {
            println!("  {}", truncate(quote, 80));
        }
        println!("Creating wallpaper at {}x{}", display.width, display.height);

        let request = render_request(&config, quote_set, display.width, display.height);
        let canvas = compose::compose(&request);
        let path = store::save_wallpaper(&dir, display.index, &canvas)?;
        println!("Wallpaper saved to {}", path.display());
        generated.push((display.index, path));
    }

    println!("\n{}", "--- Setting wallpapers ---".cyan());
    for (index, path) in &generated {
        match apply::apply(path, Some(*index), debug).await {
            Ok(strategy) => println!(
                "{}",
                format!("✓ Wallpaper set for display {index} (strategy '{strategy}')").green()
            ),
            Err(e) => report_apply_failure(path, Some(*index), &e),
        }
    }

    // Housekeeping never affects the exit status
    if let Some((_, first)) = generated.first()
        && let Err(e) = store::update_current_link(&dir, first)
    {
        if debug {
            eprintln!("current link not updated: {e:#}");
        }
    }
    if let Err(e) = store::cleanup_old_wallpapers(&dir, config.keep_per_display) {
        if debug {
            eprintln!("cleanup skipped: {e:#}");
        }
    }

    println!("\n{}", "✓ All wallpapers updated".green());
    Ok(())
}

fn preview(args: PreviewArgs, _debug: bool) -> Result<()> {
    let config = QuotewallConfig::load()?;
    let catalog = load_catalog(args.quotes.as_deref())?;
    let quote_set = catalog.pick(1)?[0];

    println!("Creating wallpaper at {}x{}", args.width, args.height);
    let request = render_request(&config, quote_set, args.width, args.height);
    let canvas = compose::compose(&request);

    canvas
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("{}", format!("Preview saved to {}", args.output.display()).green());
    Ok(())
}

async fn apply_existing(args: ApplyArgs, debug: bool) -> Result<()> {
    if !args.path.exists() {
        anyhow::bail!("image file {} does not exist", args.path.display());
    }

    match apply::apply(&args.path, args.display, debug).await {
        Ok(strategy) => {
            let slot = args
                .display
                .map(|i| format!(" for display {i}"))
                .unwrap_or_default();
            println!(
                "{}",
                format!("✓ Wallpaper set{slot} (strategy '{strategy}')").green()
            );
        }
        Err(e) => report_apply_failure(&args.path, args.display, &e),
    }
    Ok(())
}

fn list_displays(debug: bool) -> Result<()> {
    let displays = display::enumerate_displays(debug);
    println!("Detected {} display(s):", displays.len());
    for d in &displays {
        println!("  Display {}: {} ({}x{})", d.index, d.name, d.width, d.height);
    }
    Ok(())
}

fn set_background(args: BackgroundArgs) -> Result<()> {
    let mut config = QuotewallConfig::load()?;
    config.set_background(args.path.clone())?;
    println!("Backdrop configured to: {}", args.path.green());
    Ok(())
}

/// Missing or empty quote sources are the only fatal startup condition
fn load_catalog(override_path: Option<&Path>) -> Result<QuoteCatalog> {
    let path = match override_path {
        Some(path) => path.to_path_buf(),
        None => paths::default_quotes_file()?,
    };
    QuoteCatalog::load(&path)
}

fn render_request<'a>(
    config: &QuotewallConfig,
    quotes: &'a QuoteSet,
    width: u32,
    height: u32,
) -> RenderRequest<'a> {
    let mut request = RenderRequest::new(quotes, width, height);
    request.background = config.background.as_ref().map(PathBuf::from);
    request.text_color = color_or_default(&config.text_color, request.text_color, "text_color");
    request.shadow_color =
        color_or_default(&config.shadow_color, request.shadow_color, "shadow_color");
    request.margin_ratio = config.margin_ratio;
    request
}

/// A bad color in the config degrades to the default instead of aborting
fn color_or_default(value: &str, fallback: image::Rgb<u8>, what: &str) -> image::Rgb<u8> {
    match config::parse_hex_color(value) {
        Ok(color) => color,
        Err(e) => {
            println!("{}", format!("Ignoring configured {what}: {e:#}").yellow());
            fallback
        }
    }
}

fn report_apply_failure(path: &Path, target: Option<usize>, error: &ApplyError) {
    let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let slot = target
        .map(|i| format!(" for display {i}"))
        .unwrap_or_default();
    println!(
        "{}",
        format!("\n⚠ Could not set wallpaper automatically{slot}: {error}").yellow()
    );
    println!("Image saved to: {}", path.display());
    println!("To set it manually:");
    if let Some(parent) = path.parent() {
        println!("  1. Open {} in Finder", parent.display());
    }
    println!("  2. Right-click the wallpaper file and choose 'Set Desktop Picture'");
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let prefix: String = text.chars().take(limit).collect();
        format!("{prefix}...")
    }
}
