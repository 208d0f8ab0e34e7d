//! Classify the footnotes attached to member rows.
//!
//! A footnote is flattened into an ordered sequence of text and link segments. The notes
//! follow a loose "label, link, label" pattern such as
//! ```text
//! Replaced by <a href="/wiki/J%C3%B3n_J%C3%B3nsson">Jón Jónsson</a> on 5 June 2007.
//! Became a member of <a href="/wiki/Liberal_Party_(Iceland)">Liberal Party</a> in 2007.
//! Became independent in 2009.
//! Became Prime Minister in 2009.
//! ```
//! so they are matched as triples of (leading text, following segment, segment after that).

use crate::change_event::ChangeEvent;
use crate::dates::{resolve, resolve_year_only};
use crate::error::ExtractionError;

/// A link on a page.
#[derive(Debug,Clone,Eq,PartialEq)]
pub struct Link {
    pub text : String,
    /// Absolute URL of the linked page, or None if the page does not exist (a red link).
    pub target : Option<String>,
}

/// One piece of a flattened footnote.
#[derive(Debug,Clone,Eq,PartialEq)]
pub enum Segment {
    Text(String),
    Link(Link),
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Text(text) => text.as_str(),
            Segment::Link(link) => &link.text,
        }
    }
}

/// A footnote, as text and as segments.
#[derive(Debug,Clone,Eq,PartialEq)]
pub struct Annotation {
    pub text : String,
    pub segments : Vec<Segment>,
}

/// A text segment and the (up to) two segments following it.
#[derive(Debug,Clone,Copy)]
pub struct Triple<'a> {
    pub lead : &'a str,
    pub middle : Option<&'a Segment>,
    pub trail : Option<&'a Segment>,
}

impl Annotation {
    /// Build from segments, merging adjacent text so that each text segment is followed by a link or nothing.
    pub fn from_segments(segments:impl IntoIterator<Item=Segment>) -> Self {
        let mut merged : Vec<Segment> = Vec::new();
        for segment in segments {
            match (merged.last_mut(),segment) {
                (Some(Segment::Text(previous)),Segment::Text(text)) => previous.push_str(&text),
                (_,segment) => merged.push(segment),
            }
        }
        let text = merged.iter().map(|s|s.text()).collect::<String>();
        Annotation { text, segments: merged }
    }

    pub fn triples(&self) -> impl Iterator<Item=Triple<'_>> + '_ {
        self.segments.iter().enumerate().filter_map(move |(i,segment)| match segment {
            Segment::Text(lead) => Some(Triple { lead: lead.as_str(), middle: self.segments.get(i+1), trail: self.segments.get(i+2) }),
            Segment::Link(_) => None,
        })
    }

    fn find_triple(&self,lead_contains:&str) -> Option<Triple<'_>> {
        self.triples().find(|t|t.lead.contains(lead_contains))
    }
}

/// A classification rule. Returns None if the rule does not apply to this footnote.
type Rule = fn(&Annotation) -> Option<Result<ChangeEvent,ExtractionError>>;

/// Rules in priority order; the first that applies decides.
const RULES : [Rule;4] = [replaced_by,became_prime_minister,became_independent,became_member_of];

/// Work out what a footnote says happened.
///
/// A footnote matching none of the known shapes gives [ExtractionError::UnclassifiedAnnotation];
/// a recognised footnote with an unreadable date gives [ExtractionError::UnparseableDate].
pub fn classify(annotation:&Annotation) -> Result<ChangeEvent,ExtractionError> {
    RULES.iter().find_map(|rule|rule(annotation)).unwrap_or_else(||Err(ExtractionError::UnclassifiedAnnotation(annotation.text.trim().to_string())))
}

/// `Replaced by <link> on <date>`, or `... in <year>`. The date may be anywhere in the note.
fn replaced_by(annotation:&Annotation) -> Option<Result<ChangeEvent,ExtractionError>> {
    let triple = annotation.find_triple("Replaced by")?;
    let link = match triple.middle? {
        Segment::Link(link) => link,
        Segment::Text(_) => return None,
    };
    Some(resolve(&annotation.text).map(|date|ChangeEvent::Replacement {
        date,
        name: link.text.trim().to_string(),
        external_ref: link.target.clone().unwrap_or_default(),
    }))
}

/// Deliberately not turned into a record change.
fn became_prime_minister(annotation:&Annotation) -> Option<Result<ChangeEvent,ExtractionError>> {
    if annotation.text.contains("Became Prime Minister") {
        Some(Ok(ChangeEvent::Ignored { note: annotation.text.trim().to_string() }))
    } else { None }
}

/// `Became independent in <year>`
fn became_independent(annotation:&Annotation) -> Option<Result<ChangeEvent,ExtractionError>> {
    let triple = annotation.find_triple("Became independent")?;
    Some(resolve_year_only(triple.lead).map(|date|ChangeEvent::PartySwitch { date, party: "Independent".to_string() }))
}

/// `Became a member of <party link> in <year>`
fn became_member_of(annotation:&Annotation) -> Option<Result<ChangeEvent,ExtractionError>> {
    let triple = annotation.triples().find(|t|t.lead.contains("member of") && t.middle.is_some())?;
    let party = triple.middle?.text().trim().to_string();
    let date_text = triple.trail.map(|s|s.text()).unwrap_or("");
    Some(resolve_year_only(date_text).map(|date|ChangeEvent::PartySwitch { date, party }).map_err(|_|ExtractionError::UnparseableDate(annotation.text.trim().to_string())))
}
