//! Read the parts of a term page that membership extraction needs: the member table,
//! the footnotes, and the party change table if there is one.
//!
//! A member row typically looks like
//! ```text
//! <tr>
//!   <td><a href="/wiki/Geir_Haarde" title="Geir Haarde">Geir Haarde</a><sup id="cite_ref-4" class="reference"><a href="#cite_note-4">[4]</a></sup></td>
//!   <td><a href="/wiki/Independence_Party_(Iceland)" title="Independence Party (Iceland)">Independence Party</a></td>
//!   <td>Reykjavík
//!       South</td>
//! </tr>
//! ```
//! and the footnote it refers to
//! ```text
//! <li id="cite_note-4"><span class="mw-cite-backlink"><a href="#cite_ref-4">^</a></span>
//!   <span class="reference-text">Replaced by <a href="/wiki/Illugi_Gunnarsson">Illugi Gunnarsson</a> on 1 February 2009.</span></li>
//! ```

use std::collections::HashMap;
use scraper::{ElementRef, Html, Node, Selector};
use crate::annotation::{Annotation, Link, Segment};
use crate::change_table::PartyChangeRow;
use crate::error::ExtractionError;
use crate::parse_util::{collapse_whitespace, relative_url};
use crate::row_extractor::{Cell, MemberRow};

pub const MEMBER_TABLE_HEADER : &str = "Constituency";
pub const CHANGE_TABLE_HEADER : &str = "New party";

/// A parsed term page.
pub struct TermPage {
    html : Html,
    /// Relative links are resolved against this.
    base_url : String,
}

impl TermPage {
    pub fn parse(text:&str,base_url:&str) -> Self {
        TermPage { html: Html::parse_document(text), base_url: base_url.to_string() }
    }

    /// The first table with a header cell containing the given text.
    fn find_table(&self,header:&str) -> Option<ElementRef<'_>> {
        let select_th = Selector::parse("th").unwrap();
        self.html.select(&Selector::parse("table").unwrap()).find(|table|table.select(&select_th).any(|th|th.text().collect::<String>().contains(header)))
    }

    /// The rows of the member table that have data cells.
    pub fn member_rows(&self) -> Result<Vec<MemberRow>,ExtractionError> {
        let table = self.find_table(MEMBER_TABLE_HEADER).ok_or_else(||ExtractionError::MissingExpectedTable(MEMBER_TABLE_HEADER.to_string()))?;
        Ok(data_rows(table).into_iter().map(|cells|MemberRow { cells: cells.into_iter().map(|c|self.read_cell(c)).collect() }).collect())
    }

    /// All footnotes, keyed by the href used to refer to them, e.g. `#cite_note-4`.
    pub fn footnotes(&self) -> HashMap<String,Annotation> {
        let select_text = Selector::parse("span.reference-text").unwrap();
        let mut notes = HashMap::new();
        for li in self.html.select(&Selector::parse("ol.references > li").unwrap()) {
            if let Some(id) = li.value().id() {
                let content = li.select(&select_text).next().unwrap_or(li);
                let mut segments = Vec::new();
                self.flatten(content,&mut segments);
                notes.insert(format!("#{}",id),Annotation::from_segments(segments));
            }
        }
        notes
    }

    /// The rows of the party change table, or an empty list if the page does not have one.
    pub fn party_change_rows(&self) -> Result<Vec<PartyChangeRow>,ExtractionError> {
        let table = match self.find_table(CHANGE_TABLE_HEADER) {
            Some(table) => table,
            None => return Ok(vec![]),
        };
        let select_th = Selector::parse("th").unwrap();
        let headings : Vec<String> = table.select(&Selector::parse("tr").unwrap())
            .find(|tr|tr.select(&select_th).next().is_some())
            .map(|tr|tr.select(&select_th).map(|th|collapse_whitespace(&th.text().collect::<String>())).collect())
            .unwrap_or_default();
        let find_heading = |names:&[&str]| headings.iter().position(|h|names.iter().any(|n|h.contains(n)))
            .ok_or_else(||ExtractionError::MalformedRow(format!("party change table has no {} column, just {:?}",names.join("/"),headings)));
        let col_name = find_heading(&["Name","Member"][..])?;
        let col_party = find_heading(&[CHANGE_TABLE_HEADER][..])?;
        let col_date = find_heading(&["Date"][..])?;
        let mut rows = Vec::new();
        for cells in data_rows(table) {
            let cells : Vec<Cell> = cells.into_iter().map(|c|self.read_cell(c)).collect();
            let cell = |col:usize| cells.get(col).ok_or_else(||ExtractionError::MalformedRow(format!("party change row has only {} cells",cells.len())));
            let link_or_text = |cell:&Cell| collapse_whitespace(cell.links.first().map(|l|l.text.as_str()).unwrap_or(cell.text.as_str()));
            rows.push(PartyChangeRow {
                name: link_or_text(cell(col_name)?),
                new_party: link_or_text(cell(col_party)?),
                date: collapse_whitespace(&cell(col_date)?.text),
            });
        }
        Ok(rows)
    }

    fn read_link(&self,a:ElementRef) -> Link {
        let is_redlink = a.value().classes().any(|c|c=="new");
        let target = if is_redlink { None } else { a.value().attr("href").and_then(|href|relative_url(&self.base_url,href.trim()).ok()) };
        Link { text: a.text().collect::<String>().trim().to_string(), target }
    }

    fn read_cell(&self,td:ElementRef) -> Cell {
        let mut cell = Cell::default();
        self.read_cell_contents(td,&mut cell);
        cell
    }

    fn read_cell_contents(&self,element:ElementRef,cell:&mut Cell) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => cell.text.push_str(&**text),
                Node::Element(_) => if let Some(child) = ElementRef::wrap(child) {
                    if is_hidden(child) { continue }
                    if is_footnote_marker(child) {
                        cell.footnote_refs.extend(child.select(&Selector::parse("a").unwrap()).filter_map(|a|a.value().attr("href")).map(|href|href.trim().to_string()));
                    } else if child.value().name()=="a" {
                        let link = self.read_link(child);
                        cell.text.push_str(&link.text);
                        cell.links.push(link);
                    } else {
                        if child.value().name()=="br" { cell.text.push(' ') }
                        self.read_cell_contents(child,cell);
                    }
                }
                _ => {}
            }
        }
    }

    /// Flatten footnote markup into text and link segments in document order.
    fn flatten(&self,element:ElementRef,segments:&mut Vec<Segment>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => segments.push(Segment::Text((**text).to_string())),
                Node::Element(_) => if let Some(child) = ElementRef::wrap(child) {
                    if is_hidden(child) || is_footnote_marker(child) { continue }
                    if child.value().name()=="a" { segments.push(Segment::Link(self.read_link(child))) }
                    else { self.flatten(child,segments) }
                }
                _ => {}
            }
        }
    }
}

/// `<sup class="reference">` markers pointing at footnotes.
fn is_footnote_marker(element:ElementRef) -> bool {
    element.value().name()=="sup" && element.value().classes().any(|c|c=="reference")
}

/// Sort keys and similar invisible content.
fn is_hidden(element:ElementRef) -> bool {
    element.value().classes().any(|c|c=="sortkey") || element.value().attr("style").map(|s|s.replace(' ',"").contains("display:none")).unwrap_or(false)
}

/// The cells of each row of a table that has `td` cells. Header-only rows are skipped.
fn data_rows(table:ElementRef) -> Vec<Vec<ElementRef>> {
    let select_tr = Selector::parse("tr").unwrap();
    table.select(&select_tr).filter_map(|tr|{
        let cells : Vec<ElementRef> = tr.children().filter_map(ElementRef::wrap).filter(|e|matches!(e.value().name(),"td"|"th")).collect();
        if cells.iter().any(|c|c.value().name()=="td") { Some(cells) } else { None }
    }).collect()
}
