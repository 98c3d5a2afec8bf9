//! Grid container with cell spans, spacers and rule drawing.
//!
//! Children fill grid slots left to right; a `tablebr` child starts the
//! next row. A cell can cover several slots via `colspan`/`rowspan`, ask
//! for breathing room on a side with `spacer`, or for a drawn rule with
//! `border`. Adjacent cells share their separators: the stronger request
//! wins on both sides. A rule costs 3 columns between cells and 1 row
//! between rows; junction glyphs are picked from the rules that actually
//! meet at each crossing.

use crate::event::{matchbind, KeyInput};
use crate::focus::{find_first_focusable, switch_focus};
use crate::form::FormState;
use crate::geometry::{Region, Size};
use crate::render::{junction, Surface};
use crate::tree::{NodeId, WidgetState};
use crate::widget::{behavior, Behavior, WidgetKind};
use crate::widgets::boxes::apply_tie;
use crate::widgets::{layout_kv, layout_kv_int, select_style};

pub const MAX_COLS: usize = 30;
pub const MAX_ROWS: usize = 30;

/// One grid slot. Cells spanning several slots occupy all of them; only
/// the top-left slot is the master, the rest carry `spanpadding`.
#[derive(Clone, Copy, Debug, Default)]
struct Slot {
    widget: Option<NodeId>,
    spanpadding: bool,
    hexpand: bool,
    vexpand: bool,
    // Separator strength per side: 0 none, 1 spacer, 2 drawn rule.
    border_l: u8,
    border_r: u8,
    border_t: u8,
    border_b: u8,
    // Side strengths folded over the whole span, kept on the master.
    mc_border_l: u8,
    mc_border_r: u8,
    mc_border_t: u8,
    mc_border_b: u8,
}

/// Per-column or per-row sizing data.
#[derive(Clone, Copy, Debug, Default)]
struct Band {
    min: i32,
    size: i32,
    expand: bool,
}

/// A placed child and the slot span it owns.
#[derive(Clone, Copy, Debug)]
struct Cell {
    widget: NodeId,
    col: usize,
    row: usize,
    colspan: usize,
    rowspan: usize,
}

/// Grid data derived in the prepare pass and consumed by draw and by
/// directional focus movement.
#[derive(Clone, Debug)]
pub struct TableLayout {
    cols: usize,
    rows: usize,
    map: Vec<Slot>,
    cold: Vec<Band>,
    rowd: Vec<Band>,
    cells: Vec<Cell>,
}

impl Default for TableLayout {
    fn default() -> Self {
        TableLayout {
            cols: 0,
            rows: 0,
            map: vec![Slot::default(); MAX_COLS * MAX_ROWS],
            cold: vec![Band::default(); MAX_COLS],
            rowd: vec![Band::default(); MAX_ROWS],
            cells: Vec::new(),
        }
    }
}

impl TableLayout {
    fn slot(&self, col: usize, row: usize) -> &Slot {
        &self.map[row * MAX_COLS + col]
    }

    fn slot_mut(&mut self, col: usize, row: usize) -> &mut Slot {
        &mut self.map[row * MAX_COLS + col]
    }

    fn col_start(&self, rect: Region, col: usize) -> i32 {
        rect.x + self.cold[..col].iter().map(|b| b.size).sum::<i32>()
    }

    fn row_start(&self, rect: Region, row: usize) -> i32 {
        rect.y + self.rowd[..row].iter().map(|b| b.size).sum::<i32>()
    }
}

// ---------------------------------------------------------------------------
// Layout derivation
// ---------------------------------------------------------------------------

fn place_children(f: &FormState, w: NodeId) -> TableLayout {
    let mut lay = TableLayout::default();
    let children = f.tree.children(w).to_vec();
    let mut col = 0usize;
    let mut row = 0usize;

    for (idx, &c) in children.iter().enumerate() {
        if f.tree.node(c).kind == WidgetKind::TableBr {
            // A trailing row break does not open an empty row.
            if idx + 1 < children.len() {
                row += 1;
            }
            col = 0;
            continue;
        }
        while col < MAX_COLS && lay.slot(col, row).widget.is_some() {
            col += 1;
        }
        let colspan = layout_kv_int(f, c, ".colspan", 1).max(1) as usize;
        let rowspan = layout_kv_int(f, c, ".rowspan", 1).max(1) as usize;
        assert!(col + colspan <= MAX_COLS, "too many table columns");
        assert!(row + rowspan <= MAX_ROWS, "too many table rows");

        let expand = layout_kv(f, c, ".expand", "vh");
        let spacer = layout_kv(f, c, ".spacer", "");
        let border = layout_kv(f, c, ".border", "");
        let strength = |side: char| -> u8 {
            if border.contains(side) {
                2
            } else if spacer.contains(side) {
                1
            } else {
                0
            }
        };

        for j in row..row + rowspan {
            for i in col..col + colspan {
                let s = lay.slot_mut(i, j);
                s.widget = Some(c);
                s.spanpadding = !(i == col && j == row);
                s.hexpand = expand.contains('h');
                s.vexpand = expand.contains('v');
                if i == col {
                    s.border_l = strength('l');
                }
                if i == col + colspan - 1 {
                    s.border_r = strength('r');
                }
                if j == row {
                    s.border_t = strength('t');
                }
                if j == row + rowspan - 1 {
                    s.border_b = strength('b');
                }
            }
        }
        lay.cells.push(Cell { widget: c, col, row, colspan, rowspan });
        lay.cols = lay.cols.max(col + colspan);
        lay.rows = lay.rows.max(row + rowspan);
        col += colspan;
    }
    lay
}

/// Adjacent slots share one separator; the stronger request wins on both.
fn merge_borders(lay: &mut TableLayout) {
    for j in 0..lay.rows {
        for i in 1..lay.cols {
            let m = lay.slot(i - 1, j).border_r.max(lay.slot(i, j).border_l);
            lay.slot_mut(i - 1, j).border_r = m;
            lay.slot_mut(i, j).border_l = m;
        }
    }
    for i in 0..lay.cols {
        for j in 1..lay.rows {
            let m = lay.slot(i, j - 1).border_b.max(lay.slot(i, j).border_t);
            lay.slot_mut(i, j - 1).border_b = m;
            lay.slot_mut(i, j).border_t = m;
        }
    }
}

/// Mark the columns and rows an expanding cell covers, narrow spans first
/// so a wide span piggybacks on a column that already expands.
fn propagate_expansion(lay: &mut TableLayout) {
    for span in 1..=lay.cols {
        for idx in 0..lay.cells.len() {
            let cell = lay.cells[idx];
            let covered = cell.col..cell.col + cell.colspan;
            if cell.colspan > span || !lay.slot(cell.col, cell.row).hexpand {
                continue;
            }
            if covered.clone().any(|i| lay.cold[i].expand) {
                continue;
            }
            for i in covered {
                lay.cold[i].expand = true;
            }
        }
    }
    for span in 1..=lay.rows {
        for idx in 0..lay.cells.len() {
            let cell = lay.cells[idx];
            let covered = cell.row..cell.row + cell.rowspan;
            if cell.rowspan > span || !lay.slot(cell.col, cell.row).vexpand {
                continue;
            }
            if covered.clone().any(|j| lay.rowd[j].expand) {
                continue;
            }
            for j in covered {
                lay.rowd[j].expand = true;
            }
        }
    }
}

/// Fold every slot's separator strengths into its span's master slot.
fn aggregate_master_borders(lay: &mut TableLayout) {
    for idx in 0..lay.cells.len() {
        let cell = lay.cells[idx];
        for j in cell.row..cell.row + cell.rowspan {
            for i in cell.col..cell.col + cell.colspan {
                let s = *lay.slot(i, j);
                let m = lay.slot_mut(cell.col, cell.row);
                m.mc_border_l = m.mc_border_l.max(s.border_l);
                m.mc_border_r = m.mc_border_r.max(s.border_r);
                m.mc_border_t = m.mc_border_t.max(s.border_t);
                m.mc_border_b = m.mc_border_b.max(s.border_b);
            }
        }
    }
}

/// Grow the bands in `range` by `total`, preferring the expanding ones.
fn grow_bands(bands: &mut [Band], range: std::ops::Range<usize>, total: i32) {
    let expandable: Vec<usize> = range.clone().filter(|&i| bands[i].expand).collect();
    let targets = if expandable.is_empty() {
        range.collect::<Vec<usize>>()
    } else {
        expandable
    };
    let n = targets.len() as i32;
    let per = total / n;
    let rem = (total % n) as usize;
    for (k, &i) in targets.iter().enumerate() {
        bands[i].min += per + i32::from(k < rem);
    }
}

fn distribute_minima(f: &FormState, lay: &mut TableLayout) {
    for span in 1..=lay.cols {
        for idx in 0..lay.cells.len() {
            let cell = lay.cells[idx];
            if cell.colspan != span {
                continue;
            }
            let child_min = f.tree.node(cell.widget).min.width;
            let mut min_w = layout_kv_int(f, cell.widget, ".width", 1).max(child_min);
            let m = lay.slot(cell.col, cell.row);
            if cell.col == 0 && m.mc_border_l > 0 {
                min_w += 3;
            }
            if m.mc_border_r > 0 {
                min_w += 3;
            }
            let covered = cell.col..cell.col + cell.colspan;
            let have: i32 = covered.clone().map(|i| lay.cold[i].min).sum();
            if min_w > have {
                grow_bands(&mut lay.cold, covered, min_w - have);
            }
        }
    }
    for span in 1..=lay.rows {
        for idx in 0..lay.cells.len() {
            let cell = lay.cells[idx];
            if cell.rowspan != span {
                continue;
            }
            let child_min = f.tree.node(cell.widget).min.height;
            let mut min_h = layout_kv_int(f, cell.widget, ".height", 1).max(child_min);
            let m = lay.slot(cell.col, cell.row);
            if cell.row == 0 && m.mc_border_t > 0 {
                min_h += 1;
            }
            if m.mc_border_b > 0 {
                min_h += 1;
            }
            let covered = cell.row..cell.row + cell.rowspan;
            let have: i32 = covered.clone().map(|j| lay.rowd[j].min).sum();
            if min_h > have {
                grow_bands(&mut lay.rowd, covered, min_h - have);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Behavior
// ---------------------------------------------------------------------------

pub struct TableBehavior;

impl Behavior for TableBehavior {
    fn prepare(&self, f: &mut FormState, w: NodeId) {
        let children = f.tree.children(w).to_vec();
        for &c in &children {
            let kind = f.tree.node(c).kind;
            if kind != WidgetKind::TableBr {
                behavior(kind).prepare(f, c);
            }
        }
        let mut lay = place_children(f, w);
        merge_borders(&mut lay);
        propagate_expansion(&mut lay);
        aggregate_master_borders(&mut lay);
        distribute_minima(f, &mut lay);

        let min_w: i32 = lay.cold[..lay.cols].iter().map(|b| b.min).sum();
        let min_h: i32 = lay.rowd[..lay.rows].iter().map(|b| b.min).sum();
        let node = f.tree.node_mut(w);
        node.min = Size::new(min_w, min_h);
        node.state = WidgetState::Table(Box::new(lay));
    }

    fn draw(&self, f: &mut FormState, w: NodeId, surface: &mut Surface) {
        let mut lay = match std::mem::take(&mut f.tree.node_mut(w).state) {
            WidgetState::Table(b) => *b,
            WidgetState::None => return,
        };
        let rect = f.tree.node(w).rect;
        select_style(f, w, surface, "style_normal");
        for row in 0..rect.height {
            surface.fill(rect.x, rect.y + row, rect.width, ' ');
        }

        // Hand the leftover space to the expanding rows and columns.
        let min_h: i32 = lay.rowd[..lay.rows].iter().map(|b| b.min).sum();
        let mut extra = rect.height - min_h;
        let mut counter = lay.rowd[..lay.rows].iter().filter(|b| b.expand).count() as i32;
        for band in &mut lay.rowd[..lay.rows] {
            band.size = band.min;
            if band.expand {
                let e = extra / counter;
                counter -= 1;
                extra -= e;
                band.size += e;
            }
        }
        let min_w: i32 = lay.cold[..lay.cols].iter().map(|b| b.min).sum();
        let mut extra = rect.width - min_w;
        let mut counter = lay.cold[..lay.cols].iter().filter(|b| b.expand).count() as i32;
        for band in &mut lay.cold[..lay.cols] {
            band.size = band.min;
            if band.expand {
                let e = extra / counter;
                counter -= 1;
                extra -= e;
                band.size += e;
            }
        }

        for idx in 0..lay.cells.len() {
            let cell = lay.cells[idx];
            let mut x = lay.col_start(rect, cell.col);
            let mut y = lay.row_start(rect, cell.row);
            let mut cw: i32 = (cell.col..cell.col + cell.colspan)
                .map(|i| lay.cold[i].size)
                .sum();
            let mut ch: i32 = (cell.row..cell.row + cell.rowspan)
                .map(|j| lay.rowd[j].size)
                .sum();
            let m = *lay.slot(cell.col, cell.row);
            if m.mc_border_l > 0 && cell.col == 0 {
                x += 3;
                cw -= 3;
            }
            if m.mc_border_t > 0 && cell.row == 0 {
                y += 1;
                ch -= 1;
            }
            if m.mc_border_r > 0 {
                cw -= 3;
            }
            if m.mc_border_b > 0 {
                ch -= 1;
            }
            let node_min = f.tree.node(cell.widget).min;
            let tie = layout_kv(f, cell.widget, ".tie", "lrtb");
            let placed = apply_tie(Region::new(x, y, cw, ch), tie, node_min);
            f.tree.node_mut(cell.widget).rect = placed;
            let kind = f.tree.node(cell.widget).kind;
            behavior(kind).draw(f, cell.widget, surface);
        }

        draw_rules(f, w, &lay, rect, surface);
        f.tree.node_mut(w).state = WidgetState::Table(Box::new(lay));
    }

    fn process(&self, f: &mut FormState, w: NodeId, fw: NodeId, key: &KeyInput) -> bool {
        enum Dir {
            Left,
            Right,
            Up,
            Down,
        }
        let dir = if matchbind(&f.tree, w, key, "left", "LEFT") {
            Dir::Left
        } else if matchbind(&f.tree, w, key, "right", "RIGHT") {
            Dir::Right
        } else if matchbind(&f.tree, w, key, "up", "UP") {
            Dir::Up
        } else if matchbind(&f.tree, w, key, "down", "DOWN") {
            Dir::Down
        } else {
            return false;
        };
        let lay = match &f.tree.node(w).state {
            WidgetState::Table(b) => (**b).clone(),
            WidgetState::None => return false,
        };
        let Some(cell) = lay.cells.iter().find(|c| f.tree.is_in_subtree(c.widget, fw)) else {
            return false;
        };
        let probe = |i: usize, j: usize| -> Option<NodeId> {
            lay.slot(i, j)
                .widget
                .and_then(|c| find_first_focusable(&f.tree, c))
        };
        let (i, j) = (cell.col, cell.row);
        let target = match dir {
            Dir::Left => (0..i).rev().find_map(|k| probe(k, j)),
            Dir::Right => (i + 1..lay.cols).find_map(|k| probe(k, j)),
            Dir::Up => (0..j).rev().find_map(|k| probe(i, k)),
            Dir::Down => (j + 1..lay.rows).find_map(|k| probe(i, k)),
        };
        match target {
            Some(t) if t != fw => {
                switch_focus(f, Some(t));
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Rule drawing
// ---------------------------------------------------------------------------

fn draw_rules(f: &FormState, w: NodeId, lay: &TableLayout, rect: Region, surface: &mut Surface) {
    select_style(f, w, surface, "style_normal");
    for j in 0..lay.rows {
        for i in 0..lay.cols {
            let s = *lay.slot(i, j);
            let mut bx = lay.col_start(rect, i);
            let mut bw = lay.cold[i].size;
            let mut by = lay.row_start(rect, j);
            let mut bh = lay.rowd[j].size;
            // Interior slots reach back into the separator gap they share
            // with the previous column or row.
            if i > 0 {
                bx -= 3;
                bw += 3;
            }
            if j > 0 {
                by -= 1;
                bh += 1;
            }

            // Interior vertical rules belong to the previous column's
            // `border_r`; only the table's left edge draws `border_l`.
            if i == 0 && s.border_l > 1 && bh > 2 {
                surface.vline(bx + 1, by + 1, bh - 2, '│');
            }
            if s.border_t > 1 && bw > 4 {
                surface.hline(bx + 2, by, bw - 4, '─');
            }
            if s.border_r > 1 && bh > 2 {
                surface.vline(bx + bw - 2, by + 1, bh - 2, '│');
            }
            if s.border_b > 1 && bw > 4 {
                surface.hline(bx + 2, by + bh - 1, bw - 4, '─');
            }

            let right = if i + 1 < lay.cols { *lay.slot(i + 1, j) } else { Slot::default() };
            let below = if j + 1 < lay.rows { *lay.slot(i, j + 1) } else { Slot::default() };
            if i == 0 && j == 0 {
                if let Some(c) = junction(false, s.border_t > 1, false, s.border_l > 1) {
                    surface.put_ch(bx + 1, by, c);
                }
            }
            if i == 0 {
                if let Some(c) = junction(false, s.border_b > 1, s.border_l > 1, below.border_l > 1) {
                    surface.put_ch(bx + 1, by + bh - 1, c);
                }
            }
            if j == 0 {
                if let Some(c) = junction(s.border_t > 1, right.border_t > 1, false, s.border_r > 1) {
                    surface.put_ch(bx + bw - 2, by, c);
                }
            }
            if let Some(c) = junction(s.border_b > 1, right.border_b > 1, s.border_r > 1, below.border_r > 1) {
                surface.put_ch(bx + bw - 2, by + bh - 1, c);
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
