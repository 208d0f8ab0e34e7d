//! Turn one row of a term's member table into a base membership record.

use once_cell::sync::Lazy;
use regex::Regex;
use crate::annotation::Link;
use crate::config::PartyCodes;
use crate::error::ExtractionError;
use crate::member::MemberRecord;
use crate::parse_util::collapse_whitespace;

/// The contents of one table cell.
#[derive(Debug,Clone,Default,Eq,PartialEq)]
pub struct Cell {
    /// Text of the cell, without footnote markers.
    pub text : String,
    /// Links in the cell in document order, not counting footnote references.
    pub links : Vec<Link>,
    /// Footnote references in the cell, e.g. `#cite_note-3`.
    pub footnote_refs : Vec<String>,
}

/// The cells of one member row: name, party, constituency, and possibly more.
#[derive(Debug,Clone,Default,Eq,PartialEq)]
pub struct MemberRow {
    pub cells : Vec<Cell>,
}

/// A base record, and the footnote attached to it if any.
#[derive(Debug,Clone,Eq,PartialEq)]
pub struct ExtractedMember {
    pub record : MemberRecord,
    pub footnote_ref : Option<String>,
}

static PARTY_CODE : Lazy<Regex> = Lazy::new(||Regex::new(r"\(\s*([^()\s]{1,4})\s*\)").unwrap());

/// Make a base record from a row, with no dates.
pub fn extract_member(row:&MemberRow,term:&str,source_url:&str,party_codes:&PartyCodes) -> Result<ExtractedMember,ExtractionError> {
    if row.cells.len()<3 {
        return Err(ExtractionError::MalformedRow(format!("expected at least 3 cells, found {} in `{}`",row.cells.len(),row_text(row))));
    }
    let name_cell = &row.cells[0];
    let (name,external_ref) = match name_cell.links.first() {
        Some(link) => (collapse_whitespace(&link.text),link.target.clone().unwrap_or_default()),
        None => (collapse_whitespace(&name_cell.text),String::new()),
    };
    if name.is_empty() { return Err(ExtractionError::MalformedRow(format!("no name in `{}`",row_text(row)))) }
    let record = MemberRecord {
        name,
        external_ref,
        party: resolve_party(&row.cells[1],party_codes)?,
        constituency: collapse_whitespace(&row.cells[2].text),
        source_url: source_url.to_string(),
        term: term.to_string(),
        start_date: None,
        end_date: None,
    };
    Ok(ExtractedMember { record, footnote_ref: name_cell.footnote_refs.first().cloned() })
}

/// The party is a link if there is one, otherwise a code like `(D)`, otherwise plain text such as "Independent".
fn resolve_party(cell:&Cell,party_codes:&PartyCodes) -> Result<String,ExtractionError> {
    if let Some(link) = cell.links.first() {
        Ok(collapse_whitespace(&link.text))
    } else if let Some(cap) = PARTY_CODE.captures(&cell.text) {
        party_codes.get(&cap[1]).cloned().ok_or_else(||ExtractionError::UnknownPartyCode(cap[1].to_string()))
    } else {
        let text = collapse_whitespace(&cell.text);
        if text.is_empty() { Err(ExtractionError::MalformedRow("empty party cell".to_string())) } else { Ok(text) }
    }
}

fn row_text(row:&MemberRow) -> String {
    row.cells.iter().map(|c|collapse_whitespace(&c.text)).collect::<Vec<_>>().join(" | ")
}
