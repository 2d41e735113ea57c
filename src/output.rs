//! CLI output formatting.
//!
//! Display is information-centric, not file-centric: the primary line for
//! every record is its positional index and original name, with the record id
//! and processing status as indented context lines. Formatting functions
//! return lines so tests can assert on them; printing is a thin wrapper.
//!
//! ```text
//! Tray (3 images, 2 selected)
//! 001 dawn.jpg  [active] [selected]
//!     Id: dawn.jpg-1724668800000-0
//!     Processed: yes
//! 002 mountains.jpg  [selected]
//!     Id: mountains.jpg-1724668800000-1
//!     Processed: no
//! ```

use crate::collection::Tray;
use crate::export::ExportBundle;

/// Render the tray as indexed entity lines with indented context.
pub fn tray_lines(tray: &Tray) -> Vec<String> {
    let mut lines = vec![format!(
        "Tray ({} images, {} selected)",
        tray.len(),
        tray.selected_ids().len()
    )];

    for (index, record) in tray.records().iter().enumerate() {
        let mut flags = String::new();
        if tray.active_id() == Some(record.id.as_str()) {
            flags.push_str("  [active]");
        }
        if tray.is_selected(&record.id) {
            flags.push_str("  [selected]");
        }
        lines.push(format!("{:03} {}{}", index + 1, record.name, flags));
        lines.push(format!("    Id: {}", record.id));
        lines.push(format!(
            "    Processed: {}",
            if record.processed.is_some() { "yes" } else { "no" }
        ));
    }
    lines
}

pub fn print_tray(tray: &Tray) {
    for line in tray_lines(tray) {
        println!("{line}");
    }
}

/// One-line summary of a finished export.
pub fn archive_line(bundle: &ExportBundle) -> String {
    format!(
        "{} ({} entries, {} bytes)",
        bundle.filename,
        bundle.entry_count(),
        bundle.bytes.len()
    )
}
