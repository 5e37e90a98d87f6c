//! Tabular export of the accepted set to an `.xlsx` workbook.

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use crate::core::fact::Fact;

const HEADERS: [&str; 4] = ["Fact_Number", "Fact", "Keyword", "Character_Count"];

/// Excel caps worksheet names at 31 characters; leave room for the suffix.
const MAX_KEYWORD_IN_SHEET_NAME: usize = 25;
const MAX_COLUMN_WIDTH: f64 = 100.0;

/// Write the accepted set as one worksheet, overwriting any existing file.
///
/// Always writes the header row, so an aborted run with zero facts still
/// produces a well-formed (header-only) table.
pub fn export_facts(path: &Path, keyword: &str, facts: &[Fact]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name(keyword))
        .context("set worksheet name")?;

    let bold = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .context("write header row")?;
    }

    for (row, fact) in facts.iter().enumerate() {
        let row = row as u32 + 1;
        worksheet
            .write_number(row, 0, fact.sequence_number as f64)
            .and_then(|ws| ws.write_string(row, 1, &fact.text))
            .and_then(|ws| ws.write_string(row, 2, &fact.keyword))
            .and_then(|ws| ws.write_number(row, 3, fact.character_count as f64))
            .with_context(|| format!("write fact row {row}"))?;
    }

    for (col, width) in column_widths(keyword, facts).into_iter().enumerate() {
        worksheet
            .set_column_width(col as u16, width)
            .context("set column width")?;
    }

    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;
    info!(rows = facts.len(), path = %path.display(), "exported facts");
    Ok(())
}

/// Worksheet name `<keyword>_Facts`, reduced to what Excel allows.
fn sheet_name(keyword: &str) -> String {
    let cleaned: String = keyword
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\' | '\''))
        .take(MAX_KEYWORD_IN_SHEET_NAME)
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "Facts".to_string()
    } else {
        format!("{cleaned}_Facts")
    }
}

/// Widest cell per column plus padding, capped so fact text stays readable.
fn column_widths(keyword: &str, facts: &[Fact]) -> [f64; 4] {
    let mut widths = HEADERS.map(str::len);
    for fact in facts {
        widths[0] = widths[0].max(fact.sequence_number.to_string().len());
        widths[1] = widths[1].max(fact.text.chars().count());
        widths[2] = widths[2].max(keyword.chars().count());
        widths[3] = widths[3].max(fact.character_count.to_string().len());
    }
    widths.map(|w| ((w + 2) as f64).min(MAX_COLUMN_WIDTH))
}
