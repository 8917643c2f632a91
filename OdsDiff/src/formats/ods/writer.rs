//! Writing merged rows back into a table element

use std::sync::Arc;

use quick_xml::events::{BytesText, Event};

use super::document::{Cell, Row};
use super::names::{
    CELL, PARAGRAPH, ROW, ROWS_REPEATED, SPACE, SPACE_COUNT, STYLE_NAME, TAB, TABLE, VALUE_TYPE,
};
use super::reader::{blank_tail_start, repeat_count, row_elements, row_paths};
use crate::error::{Error, Result};
use crate::formats::xml::{XmlElement, XmlNode};

/// Replace the non-tail rows of `table` with `rows`.
///
/// A row read from this table goes back in place of the element it came
/// from, inside any header rows or row group. Other rows are placed before
/// the next row that has a place, or after the last one. The blank tail and
/// all non-row children stay where they are.
pub(super) fn splice_rows(table: &mut XmlElement, rows: &[Row]) -> Result<()> {
    let paths = row_paths(table);
    let body_len = blank_tail_start(&row_elements(table))?;
    let (slots, unplaced) = assign_slots(rows, body_len);

    // Back to front so earlier paths stay valid
    for (path, slot_rows) in paths[..body_len].iter().zip(slots).rev() {
        splice_at(table, path, 1, rows_to_nodes(&slot_rows)?)?;
    }
    if !unplaced.is_empty() {
        let nodes = rows_to_nodes(&unplaced)?;
        match paths.first() {
            Some(path) => splice_at(table, path, 0, nodes)?,
            None => table.children.extend(nodes),
        }
    }
    if !table.children.is_empty() {
        table.self_closing = false;
    }
    Ok(())
}

/// Group rows by the row element they are written in place of.
///
/// Returns the groups and the rows left over when the table has no body rows.
fn assign_slots(rows: &[Row], slot_count: usize) -> (Vec<Vec<&Row>>, Vec<&Row>) {
    let mut slots: Vec<Vec<&Row>> = vec![Vec::new(); slot_count];
    let mut pending = Vec::new();
    let mut current = 0;

    for row in rows {
        match row.slot {
            Some(slot) if slot >= current && slot < slot_count => {
                slots[slot].append(&mut pending);
                slots[slot].push(row);
                current = slot;
            }
            _ => pending.push(row),
        }
    }
    if let Some(last) = slots.get_mut(current) {
        last.append(&mut pending);
    }
    (slots, pending)
}

/// Replace `remove` children starting at the node `path` points to.
fn splice_at(
    table: &mut XmlElement,
    path: &[usize],
    remove: usize,
    nodes: Vec<XmlNode>,
) -> Result<()> {
    let missing = || Error::Structure {
        path: format!("{TABLE}/{ROW}{path:?}"),
    };
    let (&index, parents) = path.split_last().ok_or_else(missing)?;
    let mut parent = table;
    for &child in parents {
        parent = parent
            .children
            .get_mut(child)
            .and_then(XmlNode::as_element_mut)
            .ok_or_else(missing)?;
    }
    if index + remove > parent.children.len() {
        return Err(missing());
    }
    parent.children.splice(index..index + remove, nodes).for_each(drop);
    Ok(())
}

/// Consecutive untouched rows expanded from the same element are written as
/// that element again, with its repeat count adjusted if the run was split.
fn rows_to_nodes(rows: &[&Row]) -> Result<Vec<XmlNode>> {
    let mut nodes = Vec::new();
    let mut index = 0;
    while index < rows.len() {
        let row = rows[index];
        match &row.source {
            Some(source) if !row.touched => {
                let run = rows[index..]
                    .iter()
                    .take_while(|r| {
                        !r.touched && r.source.as_ref().is_some_and(|s| Arc::ptr_eq(s, source))
                    })
                    .count();
                nodes.push(XmlNode::Element(untouched_run(source, run)?));
                index += run;
            }
            _ => {
                nodes.push(XmlNode::Element(row_to_element(row)?));
                index += 1;
            }
        }
    }
    Ok(nodes)
}

fn untouched_run(source: &XmlElement, run: usize) -> Result<XmlElement> {
    let mut element = source.clone();
    if repeat_count(source, ROWS_REPEATED)? != run {
        if run > 1 {
            element.set_attribute(ROWS_REPEATED, &run.to_string())?;
        } else {
            element.remove_attribute(ROWS_REPEATED)?;
        }
    }
    Ok(element)
}

/// Build a row element from the row's cells.
pub(super) fn row_to_element(row: &Row) -> Result<XmlElement> {
    let mut element = match &row.source {
        Some(source) => {
            let mut element = XmlElement {
                start: source.start.clone(),
                children: Vec::new(),
                self_closing: false,
            };
            element.remove_attribute(ROWS_REPEATED)?;
            element
        }
        None => XmlElement::new(ROW),
    };
    for cell in &row.cells {
        element.push(XmlNode::Element(cell_to_element(cell)?));
    }
    Ok(element)
}

/// Build a cell element, reusing the markup the cell was read from.
pub(super) fn cell_to_element(cell: &Cell) -> Result<XmlElement> {
    let mut element = match &cell.markup {
        Some(markup) => markup.clone(),
        None => new_cell(&cell.text)?,
    };
    match &cell.style {
        Some(style) => element.set_attribute(STYLE_NAME, style)?,
        None => element.remove_attribute(STYLE_NAME)?,
    }
    Ok(element)
}

fn new_cell(text: &str) -> Result<XmlElement> {
    let mut element = XmlElement::new(CELL);
    if !text.is_empty() {
        element.set_attribute(VALUE_TYPE, "string")?;
        element.push(XmlNode::Element(paragraph(text)?));
    }
    Ok(element)
}

/// A `text:p` holding `text`, with tabs and space runs encoded so that
/// reading the paragraph back yields the same text.
fn paragraph(text: &str) -> Result<XmlElement> {
    let mut p = XmlElement::new(PARAGRAPH);
    let mut buf = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\t' => {
                flush_text(&mut p, &mut buf);
                p.push(XmlNode::Element(XmlElement::new(TAB)));
            }
            ' ' => {
                let mut run = 1;
                while chars.next_if_eq(&' ').is_some() {
                    run += 1;
                }
                // A single space survives whitespace collapsing unless it leads the paragraph
                let literal = usize::from(!(buf.is_empty() && p.children.is_empty()));
                if literal == 1 {
                    buf.push(' ');
                }
                let encoded = run - literal;
                if encoded > 0 {
                    flush_text(&mut p, &mut buf);
                    let mut space = XmlElement::new(SPACE);
                    if encoded > 1 {
                        space.set_attribute(SPACE_COUNT, &encoded.to_string())?;
                    }
                    p.push(XmlNode::Element(space));
                }
            }
            _ => buf.push(c),
        }
    }
    flush_text(&mut p, &mut buf);
    Ok(p)
}

fn flush_text(p: &mut XmlElement, buf: &mut String) {
    if !buf.is_empty() {
        p.push(XmlNode::Event(Event::Text(BytesText::new(buf).into_owned())));
        buf.clear();
    }
}
