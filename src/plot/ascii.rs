//! ASCII plotting of TCP/NTCP overlays for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - tumour curve: `T`
//! - organ curves: `1`, `2`, ... in input order (`+` after the ninth)
//! - plan EQD2 markers: `|` (tumour), `:` (organs)

use crate::domain::{CurveSeries, TissueRole};

/// Render curves with their plan EQD2 markers.
pub fn render_overlay(series: &[CurveSeries], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let (d_min, d_max) = dose_range(series).unwrap_or((0.0, 100.0));

    let mut grid = vec![vec![' '; width]; height];
    let glyphs = assign_glyphs(series);

    // Curves first so markers only fill the gaps.
    for (s, &glyph) in series.iter().zip(glyphs.iter()) {
        let points: Vec<(f64, f64)> = s.points().collect();
        draw_curve(&mut grid, &points, d_min, d_max, glyph);
    }
    for s in series {
        let Some(eqd2) = s.plan_eqd2 else {
            continue;
        };
        if !(eqd2.is_finite() && eqd2 >= d_min && eqd2 <= d_max) {
            continue;
        }
        let marker = match s.role {
            TissueRole::Tumour => '|',
            TissueRole::Organ => ':',
        };
        let x = map_x(eqd2, d_min, d_max, width);
        for row in grid.iter_mut() {
            if row[x] == ' ' {
                row[x] = marker;
            }
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: dose=[{d_min:.1}, {d_max:.1}] Gy | probability=[0.00, 1.00]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    for (s, glyph) in series.iter().zip(glyphs) {
        match s.plan_eqd2 {
            Some(eqd2) => out.push_str(&format!("  {glyph}  {} (EQD2 {eqd2:.1} Gy)\n", s.label)),
            None => out.push_str(&format!("  {glyph}  {}\n", s.label)),
        }
    }

    out
}

fn assign_glyphs(series: &[CurveSeries]) -> Vec<char> {
    let mut organ_idx = 0u32;
    series
        .iter()
        .map(|s| match s.role {
            TissueRole::Tumour => 'T',
            TissueRole::Organ => {
                organ_idx += 1;
                char::from_digit(organ_idx, 10).unwrap_or('+')
            }
        })
        .collect()
}

fn dose_range(series: &[CurveSeries]) -> Option<(f64, f64)> {
    let mut min_d = f64::INFINITY;
    let mut max_d = f64::NEG_INFINITY;
    for &d in series.iter().flat_map(|s| s.dose.iter()) {
        min_d = min_d.min(d);
        max_d = max_d.max(d);
    }
    if min_d.is_finite() && max_d.is_finite() && max_d > min_d {
        Some((min_d, max_d))
    } else {
        None
    }
}

fn map_x(d: f64, d_min: f64, d_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((d - d_min) / (d_max - d_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(p: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = p.clamp(0.0, 1.0);
    // p=1 -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], d_min: f64, d_max: f64, ch: char) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(d, p) in curve {
        let x = map_x(d, d_min, d_max, width);
        let y = map_y(p, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, y, ch);
        } else {
            grid[y][x] = ch;
        }
        prev = Some((x, y));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
