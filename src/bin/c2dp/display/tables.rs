use std::collections::HashMap;
use std::io::{self, Write};

use cp2k_deepmd::{Assembled, AtomTypes, SplitOutcome, SubsetInfo};

use crate::util::text::{ellipsize, ellipsize_front};

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();
const MAX_ROWS: usize = 12;

pub fn print_dataset_summary(assembled: &Assembled, segments: usize) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    let d = &assembled.dataset;

    let rows = vec![
        ("Segments", segments.to_string()),
        ("Steps", d.nsteps().to_string()),
        ("Atoms", d.natoms().to_string()),
        ("Types", assembled.types.type_map().join(" ")),
        ("coord / force", format!("{} × {}", d.nsteps(), d.coord.cols())),
    ];

    print_kv_table(&mut out, "Dataset Summary", &rows);
}

pub fn print_type_table(types: &AtomTypes) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for atom in types.ordering() {
        *counts.entry(atom.element.as_str()).or_insert(0) += 1;
    }

    let indices: HashMap<&str, usize> = types
        .type_map()
        .into_iter()
        .enumerate()
        .map(|(i, e)| (e, i))
        .collect();

    let mut rows: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(element, n)| match indices.get(element) {
            Some(i) => (format!("{i}: {element}"), n),
            None => (element.to_string(), n),
        })
        .collect();
    rows.sort();

    let stderr = io::stderr();
    let mut out = stderr.lock();
    print_distribution_table(&mut out, "Atom Types", &rows, types.atom_count());
}

pub fn print_subsets(title: &str, subsets: &[SubsetInfo]) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let rows_w = 8usize;
    let prec_w = 6usize;
    let sep_overhead = 9;
    let dir_w = SAFE_TABLE_WIDTH.saturating_sub(rows_w + prec_w + sep_overhead);

    let line = |l: &str, m: &str, r: &str| {
        format!(
            "{INDENT}{l}{}{m}{}{m}{}{r}",
            "─".repeat(dir_w + 2),
            "─".repeat(rows_w + 2),
            "─".repeat(prec_w + 2)
        )
    };

    let _ = writeln!(out, "{INDENT}┌─ {} ─┐", ellipsize(title, SAFE_TABLE_WIDTH - 6));
    let _ = writeln!(out, "{}", line("┌", "┬", "┐"));
    let _ = writeln!(
        out,
        "{INDENT}│ {:<dir_w$} │ {:>rows_w$} │ {:<prec_w$} │",
        "Folder", "Steps", "Dtype"
    );
    let _ = writeln!(out, "{}", line("├", "┼", "┤"));

    for subset in subsets.iter().take(MAX_ROWS) {
        let dir = subset.dir.display().to_string();
        let _ = writeln!(
            out,
            "{INDENT}│ {:<dir_w$} │ {:>rows_w$} │ {:<prec_w$} │",
            ellipsize_front(&dir, dir_w),
            subset.rows,
            subset.precision.to_string()
        );
    }
    if subsets.len() > MAX_ROWS {
        let _ = writeln!(
            out,
            "{INDENT}│ {:<dir_w$} │ {:>rows_w$} │ {:<prec_w$} │",
            format!("({} more folders)", subsets.len() - MAX_ROWS),
            "...",
            ""
        );
    }

    let _ = writeln!(out, "{}", line("└", "┴", "┘"));
}

pub fn print_split_summary(outcome: &SplitOutcome) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let total = outcome.train_rows + outcome.test_rows;
    let share = |n: usize| {
        if total == 0 {
            0.0
        } else {
            n as f64 / total as f64 * 100.0
        }
    };

    let rows = vec![
        ("Source", outcome.source.display().to_string()),
        (
            "Train",
            format!("{} ({:.1}%)", outcome.train_rows, share(outcome.train_rows)),
        ),
        (
            "Test",
            format!("{} ({:.1}%)", outcome.test_rows, share(outcome.test_rows)),
        ),
        ("Train folders", outcome.train.len().to_string()),
        ("Test folders", outcome.test.len().to_string()),
    ];

    print_kv_table(&mut out, "Split Summary", &rows);
}

fn print_distribution_table(
    out: &mut impl Write,
    title: &str,
    data: &[(String, usize)],
    total: usize,
) {
    let name_w = 10usize;
    let count_w = 8usize;
    let sep_overhead = 6;
    let dist_w = SAFE_TABLE_WIDTH.saturating_sub(name_w + count_w + sep_overhead);
    let max_bar_width = dist_w.saturating_sub(8).min(20);

    let line = |l: &str, m: &str, r: &str| {
        format!(
            "{INDENT}{l}{}{m}{}{m}{}{r}",
            "─".repeat(name_w + 2),
            "─".repeat(count_w + 2),
            "─".repeat(dist_w + 2)
        )
    };

    let _ = writeln!(out, "{INDENT}┌─ {} ─┐", ellipsize(title, SAFE_TABLE_WIDTH - 6));
    let _ = writeln!(out, "{}", line("┌", "┬", "┐"));
    let _ = writeln!(
        out,
        "{INDENT}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
        "Type", "Atoms", "Share"
    );
    let _ = writeln!(out, "{}", line("├", "┼", "┤"));

    for (name, count) in data.iter().take(MAX_ROWS) {
        let pct = if total == 0 {
            0.0
        } else {
            *count as f64 / total as f64 * 100.0
        };
        let cell = format!("{}  {:>5.1}%", make_bar(pct, max_bar_width), pct);
        let _ = writeln!(
            out,
            "{INDENT}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            ellipsize(name, name_w),
            count,
            cell
        );
    }
    if data.len() > MAX_ROWS {
        let _ = writeln!(
            out,
            "{INDENT}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            "...",
            "...",
            format!("({} more types)", data.len() - MAX_ROWS)
        );
    }

    let _ = writeln!(out, "{}", line("└", "┴", "┘"));
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let line = |l: &str, m: &str, r: &str| {
        format!(
            "{INDENT}{l}{}{m}{}{r}",
            "─".repeat(key_w + 2),
            "─".repeat(val_w + 2)
        )
    };

    let _ = writeln!(out, "{INDENT}┌─ {} ─┐", ellipsize(title, SAFE_TABLE_WIDTH - 6));
    let _ = writeln!(out, "{}", line("┌", "┬", "┐"));
    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{INDENT}│ {:<key_w$} │ {:>val_w$} │",
            ellipsize(key, key_w),
            ellipsize_front(val, val_w)
        );
    }
    let _ = writeln!(out, "{}", line("└", "┴", "┘"));
}

fn make_bar(pct: f64, max_width: usize) -> String {
    let filled = ((pct / 100.0) * max_width as f64).round() as usize;
    let filled = filled.min(max_width);
    format!("{}{}", "█".repeat(filled), "░".repeat(max_width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(make_bar(50.0, 4), "██░░");
        assert_eq!(make_bar(0.0, 3), "░░░");
        assert_eq!(make_bar(150.0, 2), "██");
    }

    #[test]
    fn distribution_table_lists_types() {
        let mut buf = Vec::new();
        let rows = vec![("0: H".to_string(), 2), ("1: O".to_string(), 1)];
        print_distribution_table(&mut buf, "Atom Types", &rows, 3);
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("0: H"));
        assert!(text.contains("66.7%"));
    }
}
