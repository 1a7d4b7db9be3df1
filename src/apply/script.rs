//! AppleScript sources for the desktop-picture strategies.
//!
//! Every script takes the image as `item 1 of argv`, so the file path is
//! bound by osascript as an argument instead of being spliced into the
//! script text.

pub fn direct(target: Option<usize>) -> String {
    match target {
        Some(index) => format!(
            r#"on run argv
tell application "System Events"
    tell desktop {index}
        set picture to POSIX file (item 1 of argv)
    end tell
end tell
end run"#
        ),
        None => r#"on run argv
tell application "System Events"
    tell every desktop
        set picture to POSIX file (item 1 of argv)
    end tell
end tell
end run"#
            .to_string(),
    }
}

/// Walks the desktop slots one by one; only meaningful without a target.
pub fn iterate() -> String {
    r#"on run argv
tell application "System Events"
    set desktopCount to count of desktops
    repeat with i from 1 to desktopCount
        tell desktop i
            set picture to POSIX file (item 1 of argv)
        end tell
    end repeat
end tell
end run"#
        .to_string()
}

/// Resolves the file to an alias first; helps on systems where the plain
/// POSIX file reference is rejected.
pub fn alias(target: Option<usize>) -> String {
    let tell = match target {
        Some(index) => format!("tell desktop {index}"),
        None => "tell every desktop".to_string(),
    };
    format!(
        r#"on run argv
set theFile to POSIX file (item 1 of argv) as alias
tell application "System Events"
    {tell}
        set picture to theFile
    end tell
end tell
end run"#
    )
}
