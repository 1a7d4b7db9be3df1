use anyhow::Result;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Run the quotewall binary with config/data dirs redirected into `home`
/// so tests never touch the real user directories.
fn run_quotewall(home: &Path, args: &[&str]) -> Result<CommandOutput> {
    let output = Command::new(env!("CARGO_BIN_EXE_quotewall"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_DATA_HOME", home.join(".local/share"))
        .output()?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

fn write_quotes(home: &Path, content: &str) -> Result<std::path::PathBuf> {
    let path = home.join("quotes.txt");
    fs::write(&path, content)?;
    Ok(path)
}

#[test]
fn test_preview_composes_an_image() -> Result<()> {
    let home = TempDir::new()?;
    let quotes = write_quotes(home.path(), "Stay hungry, stay foolish.\n")?;
    let output_image = home.path().join("preview.png");

    let output = run_quotewall(
        home.path(),
        &[
            "preview",
            output_image.to_str().unwrap(),
            "--width",
            "320",
            "--height",
            "200",
            "--quotes",
            quotes.to_str().unwrap(),
        ],
    )?;

    assert_eq!(output.exit_code, 0, "preview failed: {}", output.stderr);
    let image = image::open(&output_image)?;
    assert_eq!(image.width(), 320);
    assert_eq!(image.height(), 200);
    Ok(())
}

#[test]
fn test_preview_accepts_multi_quote_lines() -> Result<()> {
    let home = TempDir::new()?;
    let quotes = write_quotes(home.path(), "First || Second || Third\n")?;
    let output_image = home.path().join("preview.png");

    let output = run_quotewall(
        home.path(),
        &[
            "preview",
            output_image.to_str().unwrap(),
            "--width",
            "400",
            "--height",
            "300",
            "--quotes",
            quotes.to_str().unwrap(),
        ],
    )?;

    assert_eq!(output.exit_code, 0, "preview failed: {}", output.stderr);
    assert!(output_image.exists());
    Ok(())
}

#[test]
fn test_missing_quote_file_is_fatal() -> Result<()> {
    let home = TempDir::new()?;
    let output_image = home.path().join("preview.png");

    let output = run_quotewall(
        home.path(),
        &["preview", output_image.to_str().unwrap()],
    )?;

    assert_ne!(output.exit_code, 0);
    assert!(
        output.stderr.contains("quote"),
        "unexpected stderr: {}",
        output.stderr
    );
    assert!(!output_image.exists());
    Ok(())
}

#[test]
fn test_empty_quote_file_is_fatal() -> Result<()> {
    let home = TempDir::new()?;
    let quotes = write_quotes(home.path(), "\n\n  \n")?;
    let output_image = home.path().join("preview.png");

    let output = run_quotewall(
        home.path(),
        &[
            "preview",
            output_image.to_str().unwrap(),
            "--quotes",
            quotes.to_str().unwrap(),
        ],
    )?;

    assert_ne!(output.exit_code, 0);
    assert!(
        output.stderr.contains("no usable quotes"),
        "unexpected stderr: {}",
        output.stderr
    );
    Ok(())
}

/// Collect files under `root` whose names start with `prefix`.
fn find_files_with_prefix(root: &Path, prefix: &str) -> Vec<std::path::PathBuf> {
    let mut found = Vec::new();
    let Ok(entries) = fs::read_dir(root) else {
        return found;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            found.extend(find_files_with_prefix(&path, prefix));
        } else if entry.file_name().to_string_lossy().starts_with(prefix) {
            found.push(path);
        }
    }
    found
}

#[test]
fn test_run_persists_a_wallpaper_even_without_scripting_host() -> Result<()> {
    let home = TempDir::new()?;
    let quotes = write_quotes(home.path(), "Make it work, make it right.\n")?;

    let output = run_quotewall(
        home.path(),
        &["run", "--quotes", quotes.to_str().unwrap()],
    )?;

    // Apply failures are reported but never fatal
    assert_eq!(output.exit_code, 0, "run failed: {}", output.stderr);
    assert!(
        output.stdout.contains("Wallpaper saved to"),
        "unexpected stdout: {}",
        output.stdout
    );

    let generated = find_files_with_prefix(home.path(), "wallpaper_display1_");
    assert!(!generated.is_empty(), "expected a generated wallpaper");
    let image = image::open(&generated[0])?;
    assert!(image.width() > 0 && image.height() > 0);

    let links = find_files_with_prefix(home.path(), "current_wallpaper");
    assert_eq!(links.len(), 1, "expected the current link to exist");
    Ok(())
}

#[test]
fn test_displays_always_reports_at_least_one() -> Result<()> {
    let home = TempDir::new()?;

    let output = run_quotewall(home.path(), &["displays"])?;

    assert_eq!(output.exit_code, 0, "displays failed: {}", output.stderr);
    assert!(
        output.stdout.contains("Display 1:"),
        "unexpected stdout: {}",
        output.stdout
    );
    Ok(())
}
