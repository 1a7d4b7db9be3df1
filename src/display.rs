//! Display enumeration via system_profiler
//!
//! Parses the indentation-structured output of
//! `system_profiler SPDisplaysDataType` into one descriptor per attached
//! display. Falls back to a single default descriptor when the utility is
//! missing or its output is unparseable, so callers always get at least
//! one display to render for.

use anyhow::Result;
use colored::*;
use regex::Regex;
use std::process::Command;

pub const DEFAULT_WIDTH: u32 = 2560;
pub const DEFAULT_HEIGHT: u32 = 1440;

/// Display name lines sit at this indentation range in the profiler output
const NAME_INDENT_MIN: usize = 8;
const NAME_INDENT_MAX: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayDescriptor {
    /// 1-based position, matching the desktop slot the applier addresses
    pub index: usize,
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl DisplayDescriptor {
    fn fallback() -> Self {
        Self {
            index: 1,
            name: "Default Display".to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Query the attached displays. Never fails: any query or parse problem
/// degrades to a single descriptor with the default resolution.
pub fn enumerate_displays(debug: bool) -> Vec<DisplayDescriptor> {
    let parsed = match query_displays() {
        Ok(text) => parse_displays(&text).unwrap_or_default(),
        Err(e) => {
            if debug {
                eprintln!("system_profiler query failed: {e:#}");
            }
            Vec::new()
        }
    };
    displays_or_default(parsed)
}

fn query_displays() -> Result<String> {
    let output = Command::new("system_profiler")
        .arg("SPDisplaysDataType")
        .output()?;
    if !output.status.success() {
        anyhow::bail!("system_profiler exited with {}", output.status);
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

fn displays_or_default(parsed: Vec<DisplayDescriptor>) -> Vec<DisplayDescriptor> {
    if parsed.is_empty() {
        println!(
            "{}",
            format!("Could not detect displays, assuming {DEFAULT_WIDTH}x{DEFAULT_HEIGHT}")
                .yellow()
        );
        vec![DisplayDescriptor::fallback()]
    } else {
        parsed
    }
}

/// A display block mid-parse; only emitted once a resolution shows up.
struct PartialDisplay {
    name: String,
    resolution: Option<(u32, u32)>,
}

fn parse_displays(text: &str) -> Result<Vec<DisplayDescriptor>> {
    let resolution_re = Regex::new(r"(\d+)\s*x\s*(\d+)")?;

    let mut displays: Vec<DisplayDescriptor> = Vec::new();
    let mut in_displays_section = false;
    let mut pending_name: Option<String> = None;
    let mut current: Option<PartialDisplay> = None;

    for line in text.lines() {
        let stripped = line.trim();
        let indent = line.len() - line.trim_start().len();

        if stripped == "Displays:" {
            in_displays_section = true;
            pending_name = None;
            continue;
        }
        if !in_displays_section {
            continue;
        }

        if stripped.contains("Resolution:") {
            // A new resolution line either starts the block named by the
            // preceding colon line, or (with no name line) an anonymous one.
            if let Some(name) = pending_name.take() {
                flush(&mut displays, current.take());
                current = Some(PartialDisplay {
                    name,
                    resolution: None,
                });
            } else if current.is_none() {
                current = Some(PartialDisplay {
                    name: String::new(),
                    resolution: None,
                });
            }

            if let Some(caps) = resolution_re.captures(stripped)
                && let (Ok(width), Ok(height)) = (caps[1].parse(), caps[2].parse())
                && let Some(display) = current.as_mut()
            {
                display.resolution = Some((width, height));
            }
            continue;
        }

        if !stripped.is_empty()
            && stripped.ends_with(':')
            && (NAME_INDENT_MIN..=NAME_INDENT_MAX).contains(&indent)
        {
            pending_name = Some(stripped.trim_end_matches(':').trim().to_string());
        } else if indent < NAME_INDENT_MIN && !stripped.is_empty() {
            // A less-indented line ends the display list
            flush(&mut displays, current.take());
            in_displays_section = false;
            pending_name = None;
        }
    }
    flush(&mut displays, current.take());

    Ok(displays)
}

/// Blocks without a recoverable resolution are dropped, not emitted
fn flush(displays: &mut Vec<DisplayDescriptor>, partial: Option<PartialDisplay>) {
    if let Some(partial) = partial
        && let Some((width, height)) = partial.resolution
    {
        let index = displays.len() + 1;
        let name = if partial.name.is_empty() {
            format!("Display {index}")
        } else {
            partial.name
        };
        displays.push(DisplayDescriptor {
            index,
            name,
            width,
            height,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_DISPLAY_OUTPUT: &str = "\
Graphics/Displays:

    Apple M1 Max:

      Chipset Model: Apple M1 Max
      Type: GPU
      Bus: Built-In
      Displays:
        LG UltraFine:
          Resolution: 3840 x 2160 (2160p/4K UHD 1 - Ultra High Definition)
          Main Display: Yes
          Mirror: Off
          Online: Yes
        DELL U2720Q:
          Resolution: 3440 x 1440
          Mirror: Off
          Online: Yes
";

    #[test]
    fn test_parses_two_displays_in_order() {
        let displays = parse_displays(TWO_DISPLAY_OUTPUT).unwrap();
        assert_eq!(displays.len(), 2);

        assert_eq!(displays[0].index, 1);
        assert_eq!(displays[0].name, "LG UltraFine");
        assert_eq!(displays[0].width, 3840);
        assert_eq!(displays[0].height, 2160);

        assert_eq!(displays[1].index, 2);
        assert_eq!(displays[1].name, "DELL U2720Q");
        assert_eq!(displays[1].width, 3440);
        assert_eq!(displays[1].height, 1440);
    }

    #[test]
    fn test_display_without_resolution_is_dropped() {
        let output = "\
      Displays:
        Broken Panel:
          Mirror: Off
        Working Panel:
          Resolution: 1920 x 1080
";
        let displays = parse_displays(output).unwrap();
        assert_eq!(displays.len(), 1);
        assert_eq!(displays[0].name, "Working Panel");
        assert_eq!(displays[0].index, 1);
    }

    #[test]
    fn test_resolution_without_name_line_gets_placeholder() {
        let output = "\
      Displays:
          Resolution: 2560 x 1600 Retina
";
        let displays = parse_displays(output).unwrap();
        assert_eq!(displays.len(), 1);
        assert_eq!(displays[0].name, "Display 1");
        assert_eq!(displays[0].width, 2560);
        assert_eq!(displays[0].height, 1600);
    }

    #[test]
    fn test_less_indented_line_ends_display_section() {
        let output = "\
      Displays:
        Panel A:
          Resolution: 1920 x 1080
    Another Section:
        Panel B:
          Resolution: 1280 x 720
";
        let displays = parse_displays(output).unwrap();
        assert_eq!(displays.len(), 1);
        assert_eq!(displays[0].name, "Panel A");
    }

    #[test]
    fn test_compact_resolution_token_is_accepted() {
        let output = "\
      Displays:
        Panel:
          Resolution: 3840x2160
";
        let displays = parse_displays(output).unwrap();
        assert_eq!(displays.len(), 1);
        assert_eq!(displays[0].width, 3840);
        assert_eq!(displays[0].height, 2160);
    }

    #[test]
    fn test_unparseable_output_falls_back_to_default() {
        let parsed = parse_displays("nothing useful here").unwrap();
        assert!(parsed.is_empty());

        let displays = displays_or_default(parsed);
        assert_eq!(displays.len(), 1);
        assert_eq!(
            displays[0],
            DisplayDescriptor {
                index: 1,
                name: "Default Display".to_string(),
                width: DEFAULT_WIDTH,
                height: DEFAULT_HEIGHT,
            }
        );
    }
}
