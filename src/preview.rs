//! テキスト表示（ターミナル用）

use plate_pioneer_common::{row_label, CellValue, Grid, TidyTable};

const MAX_CELL_WIDTH: usize = 16;

fn clip(text: &str) -> String {
    if text.chars().count() > MAX_CELL_WIDTH {
        let mut s: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        s.push('…');
        s
    } else {
        text.to_string()
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{:<width$}", c, width = *w))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// 整形済みテーブルの先頭 `limit` 行
pub fn render_table(table: &TidyTable, limit: usize) -> String {
    let header: Vec<String> = table.columns().iter().map(|c| clip(c)).collect();
    let body: Vec<Vec<String>> = table
        .rows()
        .take(limit)
        .map(|r| r.cells().iter().map(|c| clip(&c.to_string())).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &body {
        push_line(&mut out, row, &widths);
    }
    if table.len() > limit {
        out.push_str(&format!("... ({}行中 {}行を表示)\n", table.len(), limit));
    }
    out
}

/// 濃淡記号（最小→最大）
const HEAT_GLYPHS: [char; 5] = ['.', '-', '+', '*', '#'];

fn plate_layout(grid: &Grid, cell: impl Fn(&CellValue) -> String) -> String {
    let mut header = vec![String::new()];
    header.extend((1..=grid.width()).map(|c| c.to_string()));

    let body: Vec<Vec<String>> = grid
        .rows()
        .enumerate()
        .map(|(i, cells)| {
            let mut line = vec![row_label(i).map(String::from).unwrap_or_else(|| i.to_string())];
            line.extend(cells.iter().map(&cell));
            line
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    for row in &body {
        push_line(&mut out, row, &widths);
    }
    out
}

/// グリッドをプレート配置（行A〜 x 列1〜）で表示
pub fn render_plate(grid: &Grid) -> String {
    plate_layout(grid, |c| clip(&c.to_string()))
}

/// 数値セルを最小〜最大の5段階の記号で表示（数値以外は空欄）
pub fn render_heatmap(grid: &Grid) -> String {
    let (min, max) = grid
        .rows()
        .flatten()
        .filter_map(CellValue::as_f64)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min > max {
        return plate_layout(grid, |_| String::new());
    }

    let span = max - min;
    let levels = (HEAT_GLYPHS.len() - 1) as f64;
    let mut out = plate_layout(grid, |c| match c.as_f64() {
        Some(v) if span > 0.0 => {
            let level = (((v - min) / span) * levels).round() as usize;
            HEAT_GLYPHS[level.min(HEAT_GLYPHS.len() - 1)].to_string()
        }
        Some(_) => HEAT_GLYPHS[0].to_string(),
        None => String::new(),
    });
    out.push_str(&format!(
        "{} = {}  {} = {}\n",
        HEAT_GLYPHS[0],
        CellValue::Float(min),
        HEAT_GLYPHS[HEAT_GLYPHS.len() - 1],
        CellValue::Float(max)
    ));
    out
}
