//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one line per item.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use parkwatch_core::StatusColor;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Paint a status label in its legend color.
pub fn paint_status(label: &str, color: StatusColor, enabled: bool) -> String {
    if !enabled {
        return label.to_owned();
    }
    match color {
        StatusColor::Green => label.green().to_string(),
        StatusColor::Red => label.red().to_string(),
        StatusColor::Yellow => label.yellow().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list in the chosen format.
///
/// `table` builds rows through `to_row`, `plain` emits `line_fn` per item,
/// the structured formats serialize the original data.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    line_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(line_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single item. Table output comes from `detail_fn`.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    line_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(line_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Serialize(e.to_string()))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use parkwatch_core::Counts;

    use super::*;

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Free")]
        free: u64,
    }

    fn counts() -> Vec<Counts> {
        vec![Counts {
            available: 3,
            occupied: 9,
        }]
    }

    #[test]
    fn table_uses_row_mapping() {
        let out = render_list(
            &OutputFormat::Table,
            &counts(),
            |c| Row { free: c.available },
            |c| c.available.to_string(),
        )
        .unwrap();
        assert!(out.contains("Free"));
        assert!(out.contains('3'));
        assert!(out.contains('╭'));
    }

    #[test]
    fn compact_json_serializes_the_source_data() {
        let out = render_list(
            &OutputFormat::JsonCompact,
            &counts(),
            |c| Row { free: c.available },
            |c| c.available.to_string(),
        )
        .unwrap();
        assert_eq!(out, r#"[{"available":3,"occupied":9}]"#);
    }

    #[test]
    fn plain_emits_one_line_per_item() {
        let out = render_single(
            &OutputFormat::Plain,
            &counts()[0],
            |_| String::new(),
            |c| format!("{} {}", c.available, c.occupied),
        )
        .unwrap();
        assert_eq!(out, "3 9");
    }

    #[test]
    fn disabled_color_leaves_labels_untouched() {
        assert_eq!(paint_status("Reserved", StatusColor::Yellow, false), "Reserved");
        assert_ne!(paint_status("Reserved", StatusColor::Yellow, true), "Reserved");
    }
}
