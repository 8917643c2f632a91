//! Sheet extraction from a parsed `content.xml`
//!
//! Repeat attributes are expanded so that each [`Row`] and [`Cell`] is one
//! logical row or cell. Rows inside header rows and row groups are read in
//! document order. The run of blank rows at the end of a table is left out of
//! the row sequence.

use std::sync::Arc;

use quick_xml::events::Event;

use super::document::{Cell, Row, Sheet};
use super::names::{
    ANNOTATION, CELL, COLUMN, COLUMN_CONTAINERS, COLUMNS_REPEATED, COVERED_CELL, LINE_BREAK,
    PARAGRAPH, ROW, ROW_CONTAINERS, ROWS_REPEATED, SPACE, SPACE_COUNT, STYLE_NAME, TAB, TABLE, TABLE_NAME,
};
use crate::error::{Error, Result};
use crate::formats::xml::{XmlElement, XmlNode};

/// Upper bound on the number of logical rows expanded from one sheet.
pub const MAX_ROWS: usize = 1_048_576;

pub(super) fn read_sheet(table: &XmlElement) -> Result<Sheet> {
    let name = table.attribute(TABLE_NAME)?.unwrap_or_default();
    let column = first_column(table).ok_or_else(|| Error::Structure {
        path: format!("{TABLE}[@{TABLE_NAME}='{name}']/{COLUMN}"),
    })?;
    let column_count = repeat_count(column, COLUMNS_REPEATED)?;

    let elements = row_elements(table);
    let body_len = blank_tail_start(&elements)?;

    let mut rows = Vec::new();
    for (slot, element) in elements[..body_len].iter().enumerate() {
        let remaining = MAX_ROWS - rows.len();
        let mut repeat = repeat_count(element, ROWS_REPEATED)?;
        if repeat > remaining {
            tracing::warn!(
                "Sheet '{}' exceeds {} rows, ignoring the rest",
                name,
                MAX_ROWS
            );
            repeat = remaining;
        }

        let cells = read_cells(element, column_count)?;
        let source = Arc::new((*element).clone());
        rows.extend((0..repeat).map(|_| Row {
            cells: cells.clone(),
            source: Some(Arc::clone(&source)),
            slot: Some(slot),
            ..Row::default()
        }));

        if rows.len() == MAX_ROWS {
            break;
        }
    }

    tracing::debug!(
        "Read sheet '{}': {} columns, {} rows, {} tail row elements",
        name,
        column_count,
        rows.len(),
        elements.len() - body_len
    );

    Ok(Sheet::new(name, column_count, rows))
}

/// Child-index paths of the table's row elements in document order, looking
/// into header rows and row groups.
pub(super) fn row_paths(table: &XmlElement) -> Vec<Vec<usize>> {
    let mut paths = Vec::new();
    collect_row_paths(table, &mut Vec::new(), &mut paths);
    paths
}

fn collect_row_paths(parent: &XmlElement, prefix: &mut Vec<usize>, paths: &mut Vec<Vec<usize>>) {
    for (index, node) in parent.children.iter().enumerate() {
        let Some(el) = node.as_element() else {
            continue;
        };
        if el.is(ROW) {
            prefix.push(index);
            paths.push(prefix.clone());
            prefix.pop();
        } else if ROW_CONTAINERS.iter().any(|name| el.is(name)) {
            prefix.push(index);
            collect_row_paths(el, prefix, paths);
            prefix.pop();
        }
    }
}

/// Descendant of `root` at a child-index path.
pub(super) fn element_at<'a>(root: &'a XmlElement, path: &[usize]) -> Option<&'a XmlElement> {
    path.iter()
        .try_fold(root, |el, &index| el.children.get(index)?.as_element())
}

pub(super) fn row_elements(table: &XmlElement) -> Vec<&XmlElement> {
    row_paths(table)
        .iter()
        .filter_map(|path| element_at(table, path))
        .collect()
}

/// First column definition in document order, looking into column groups.
fn first_column(parent: &XmlElement) -> Option<&XmlElement> {
    for el in parent.elements() {
        if el.is(COLUMN) {
            return Some(el);
        }
        if COLUMN_CONTAINERS.iter().any(|name| el.is(name)) {
            if let Some(column) = first_column(el) {
                return Some(column);
            }
        }
    }
    None
}

fn read_cells(row: &XmlElement, column_count: usize) -> Result<Vec<Cell>> {
    let mut cells = Vec::new();
    for el in row.elements().filter(|el| is_cell(el)) {
        let remaining = column_count.saturating_sub(cells.len());
        if remaining == 0 {
            break;
        }
        let repeat = repeat_count(el, COLUMNS_REPEATED)?.min(remaining);

        let mut markup = el.clone();
        markup.remove_attribute(COLUMNS_REPEATED)?;
        let cell = Cell {
            text: cell_text(el)?,
            style: el.attribute(STYLE_NAME)?,
            markup: Some(markup),
        };
        cells.extend(std::iter::repeat_n(cell, repeat));
    }
    Ok(cells)
}

/// Index of the first row element in the trailing run of blank rows.
pub(super) fn blank_tail_start(rows: &[&XmlElement]) -> Result<usize> {
    let mut start = rows.len();
    while start > 0 {
        if !is_blank_row(rows[start - 1])? {
            break;
        }
        start -= 1;
    }
    Ok(start)
}

fn is_blank_row(row: &XmlElement) -> Result<bool> {
    for cell in row.elements().filter(|el| is_cell(el)) {
        if !cell_text(cell)?.is_empty() {
            return Ok(false);
        }
    }
    Ok(true)
}

fn is_cell(el: &XmlElement) -> bool {
    el.is(CELL) || el.is(COVERED_CELL)
}

/// Value of a repeat attribute; absent, zero or unparsable values count as 1.
pub(super) fn repeat_count(el: &XmlElement, attr: &str) -> Result<usize> {
    Ok(el
        .attribute(attr)?
        .and_then(|value| value.trim().parse::<usize>().ok())
        .map_or(1, |count| count.max(1)))
}

/// Text content of a cell
///
/// Direct `text:p` paragraphs are joined by a single space. `text:s` expands
/// to spaces, `text:tab` to a tab and `text:line-break` to a space;
/// annotations are skipped. The result never contains a line break.
///
/// # Errors
/// Returns an error if a text node cannot be unescaped.
pub fn cell_text(cell: &XmlElement) -> Result<String> {
    let mut paragraphs = Vec::new();
    for p in cell.elements().filter(|el| el.is(PARAGRAPH)) {
        let mut text = String::new();
        inline_text(p, &mut text)?;
        paragraphs.push(text);
    }
    Ok(paragraphs.join(" ").replace(['\n', '\r'], " "))
}

fn inline_text(el: &XmlElement, out: &mut String) -> Result<()> {
    for child in &el.children {
        match child {
            XmlNode::Event(Event::Text(text)) => out.push_str(&text.unescape()?),
            XmlNode::Event(Event::CData(data)) => out.push_str(&String::from_utf8_lossy(data)),
            XmlNode::Event(_) => {}
            XmlNode::Element(e) if e.is(SPACE) => {
                out.extend(std::iter::repeat_n(' ', repeat_count(e, SPACE_COUNT)?));
            }
            XmlNode::Element(e) if e.is(TAB) => out.push('\t'),
            XmlNode::Element(e) if e.is(LINE_BREAK) => out.push(' '),
            XmlNode::Element(e) if e.is(ANNOTATION) => {}
            XmlNode::Element(e) => inline_text(e, out)?,
        }
    }
    Ok(())
}
