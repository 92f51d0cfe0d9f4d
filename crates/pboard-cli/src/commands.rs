//! Subcommand implementations.
//!
//! Each command takes the clipboard handle and its output streams so it can
//! run against the in-memory pasteboard in tests.

use std::io::Write;

use anyhow::{bail, Context};
use pboard_clipboard::{ClipboardChange, ClipboardHandle};
use pboard_types::{ClipboardInformation, ClipboardTypeFilter};
use tracing::info;

/// Build a read filter from kind flags, falling back to `default` when no
/// flag is set.
pub fn filter_from_flags(
    text: bool,
    image: bool,
    files: bool,
    default: ClipboardTypeFilter,
) -> ClipboardTypeFilter {
    if text || image || files {
        ClipboardTypeFilter { text, image, files }
    } else {
        default
    }
}

pub fn info(handle: &ClipboardHandle, out: &mut impl Write) -> anyhow::Result<()> {
    let info = handle.query_information()?;
    write_information(&info, out)?;
    Ok(())
}

pub fn count(handle: &ClipboardHandle, out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "{}", handle.change_count()?)?;
    Ok(())
}

/// Write the payload to `out` and a one-line summary to `summary`.
pub fn read(
    handle: &ClipboardHandle,
    filter: &ClipboardTypeFilter,
    out: &mut impl Write,
    summary: &mut impl Write,
) -> anyhow::Result<ClipboardInformation> {
    let (data, info) = handle.read(filter)?;
    out.write_all(data.as_bytes())
        .context("writing clipboard payload")?;
    out.flush()?;
    writeln!(summary, "{info}, {} byte(s)", data.len())?;
    Ok(info)
}

pub fn write(handle: &ClipboardHandle, text: &str) -> anyhow::Result<()> {
    handle.write(text)?;
    info!(bytes = text.len(), "clipboard replaced");
    Ok(())
}

pub fn formats(handle: &ClipboardHandle, out: &mut impl Write) -> anyhow::Result<()> {
    for declared in handle.declared_types()? {
        writeln!(out, "{declared}")?;
    }
    Ok(())
}

pub fn raw(handle: &ClipboardHandle, declared_type: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let Some(data) = handle.read_raw(declared_type)? else {
        bail!("clipboard does not provide {declared_type}");
    };
    out.write_all(data.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// One line per observed change, as printed by `watch`.
pub fn format_change(change: &ClipboardChange) -> String {
    format!("[{}] {}", change.change_count, change.information)
}

fn write_information(info: &ClipboardInformation, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "content: {}", info.content_type)?;
    writeln!(out, "format:  {} ({})", info.format, info.format.tag())?;
    writeln!(out, "items:   {}", info.item_count)
}
