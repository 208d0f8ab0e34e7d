//! Turn the Wikipedia lists of members of the Althing, one page per term, into membership records.
//!
//! As with other scraped sources there are two stages:
//! * Download each term page. After downloading, it is parsed and, if there are no errors, placed in
//!   the source directory. This is [update_member_list_of_files].
//! * Parse every cached page, accumulating the records. This is [create_member_list].
//!
//! So a page whose format has changed never overwrites a working copy, and the second stage
//! never touches the network.
//!
//! For each row of a page the base record comes from the row itself; a mid-term change may
//! come from the page's party change table or from a footnote on the member's name, with
//! the footnote winning if both are present.

use std::collections::HashMap;
use std::path::PathBuf;
use anyhow::{anyhow, Context};
use crate::annotation::{classify, Annotation};
use crate::change_event::{choose_event, materialize, ChangeEvent};
use crate::change_table::PartyChangeIndex;
use crate::config::{Config, PartyCodes, TermSource};
use crate::error::ExtractionError;
use crate::member::MemberRecord;
use crate::parse_util::download_to_file;
use crate::row_extractor::{extract_member, ExtractedMember};
use crate::store::MemberStore;
use crate::term_page::TermPage;

/// Work out the event, if any, for one base record. Unrecognised footnotes are logged and ignored.
pub fn derive_event(member:&ExtractedMember,footnotes:&HashMap<String,Annotation>,changes:&PartyChangeIndex) -> Result<Option<ChangeEvent>,ExtractionError> {
    let from_change_table = changes.event_for(&member.record.name);
    let from_footnote = match &member.footnote_ref {
        None => None,
        Some(reference) => match footnotes.get(reference) {
            None => {
                log::warn!("Footnote {} for {} not found on page",reference,member.record.name);
                None
            }
            Some(annotation) => match classify(annotation) {
                Ok(event) => Some(event),
                Err(e) if e.is_recoverable() => {
                    log::warn!("{} for {} in {}; leaving record unchanged",e,member.record.name,member.record.term);
                    None
                }
                Err(e) => return Err(e),
            },
        },
    };
    if let Some(ChangeEvent::Ignored { note }) = &from_footnote {
        log::debug!("Not changing {} for note `{}`",member.record.name,note);
    }
    Ok(choose_event(from_change_table,from_footnote))
}

/// The records for one member row: the base record, and its successor if it changed mid-term.
pub fn derive_records(member:ExtractedMember,footnotes:&HashMap<String,Annotation>,changes:&PartyChangeIndex) -> Result<Vec<MemberRecord>,ExtractionError> {
    let event = derive_event(&member,footnotes,changes)?;
    Ok(match event {
        Some(event) => {
            let (base,successor) = materialize(member.record,&event);
            std::iter::once(base).chain(successor).collect()
        }
        None => vec![member.record],
    })
}

/// Extract all the records from the text of a term page.
pub fn parse_term_page(text:&str,term:&str,source_url:&str,party_codes:&PartyCodes) -> Result<Vec<MemberRecord>,ExtractionError> {
    let page = TermPage::parse(text,source_url);
    let rows = page.member_rows()?;
    let footnotes = page.footnotes();
    let changes = PartyChangeIndex::build(page.party_change_rows()?)?;
    log::debug!("{} has {} member rows, {} footnotes, {} party changes",term,rows.len(),footnotes.len(),changes.len());
    let mut records = Vec::new();
    for row in &rows {
        let member = extract_member(row,term,source_url,party_codes)?;
        records.extend(derive_records(member,&footnotes,&changes)?);
    }
    Ok(records)
}

/// Check that every record ending early has a successor in the same term starting when it ended,
/// and that no record ends before it starts. Returns a description of each problem found.
pub fn check_continuity(records:&[MemberRecord]) -> Vec<String> {
    let mut problems = Vec::new();
    for (i,record) in records.iter().enumerate() {
        if !record.span_is_ordered() {
            problems.push(format!("{} ends before it starts",record));
        }
        if let Some(end) = record.end_date {
            let has_successor = records.iter().enumerate().any(|(j,other)|j!=i && other.term==record.term && other.start_date==Some(end) && (other.name!=record.name || other.party!=record.party));
            if !has_successor {
                problems.push(format!("{} ends on {} with no successor",record,end));
            }
        }
    }
    problems
}

fn parse_term_file(config:&Config,term:&TermSource,path:&std::path::Path) -> anyhow::Result<Vec<MemberRecord>> {
    let text = std::fs::read_to_string(path).with_context(||format!("Could not read {}",path.display()))?;
    let records = parse_term_page(&text,&term.name,&term.source_url(config),&config.party_codes_for(term))?;
    for problem in check_continuity(&records) {
        log::warn!("{}: {}",term.name,problem);
    }
    Ok(records)
}

/// Which of the configured terms to process.
fn selected_terms<'a>(config:&'a Config,only:&[String]) -> anyhow::Result<Vec<&'a TermSource>> {
    if only.is_empty() { return Ok(config.terms.iter().collect()) }
    only.iter().map(|name|config.find_term(name).ok_or_else(||anyhow!("No term {} in configuration",name))).collect()
}

fn failure_summary(failed:&[(String,anyhow::Error)]) -> anyhow::Result<()> {
    if failed.is_empty() { Ok(()) }
    else { Err(anyhow!("Failed for term(s) {}",failed.iter().map(|(t,_)|t.as_str()).collect::<Vec<_>>().join(", "))) }
}

/// Download, check, and if valid replace the cached term pages. First of the two stages.
/// If `missing_only` then terms that already have a cached page are not downloaded again.
pub async fn update_member_list_of_files(config:&Config,only:&[String],missing_only:bool) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.source_dir)?;
    let client = reqwest::Client::new();
    let mut failed = Vec::new();
    for term in selected_terms(config,only)? {
        let destination = config.source_dir.join(term.file_name());
        if missing_only && destination.exists() {
            log::info!("Already have {}",destination.display());
            continue;
        }
        let url = term.source_url(config);
        let res = async {
            let temp_file = download_to_file(&url,&client,&config.user_agent,&config.source_dir).await?;
            let records = parse_term_file(config,term,temp_file.path())?;
            temp_file.persist(&destination)?;
            Ok::<usize,anyhow::Error>(records.len())
        }.await.with_context(||format!("{} from {}",term.name,url));
        match res {
            Ok(count) => log::info!("Stored {} with {} records",destination.display(),count),
            Err(e) => {
                log::error!("Keeping previous copy of {} : {:#}",term.name,e);
                failed.push((term.name.clone(),e));
            }
        }
    }
    failure_summary(&failed)
}

/// The result of processing the cached term pages.
pub struct MemberList {
    /// Every record, in page order.
    pub records : Vec<MemberRecord>,
    /// The records keyed by (name, term).
    pub store : MemberStore,
    /// Terms that could not be processed, and why.
    pub failed : Vec<(String,anyhow::Error)>,
}

impl MemberList {
    pub fn check(&self) -> anyhow::Result<()> { failure_summary(&self.failed) }
}

/// Parse the cached term pages downloaded by [update_member_list_of_files]. Second of the two stages.
/// A term that fails is logged and left out; the others are still processed.
pub fn create_member_list(config:&Config,only:&[String]) -> anyhow::Result<MemberList> {
    let mut list = MemberList { records: vec![], store: MemberStore::new(), failed: vec![] };
    for term in selected_terms(config,only)? {
        let path : PathBuf = config.source_dir.join(term.file_name());
        log::info!("Processing {}",term.name);
        match parse_term_file(config,term,&path).with_context(||term.name.clone()) {
            Ok(records) => {
                log::info!("Found {} records for {}",records.len(),term.name);
                list.store.save_all(records.iter().cloned());
                list.records.extend(records);
            }
            Err(e) => {
                log::error!("Skipping term {} : {:#}",term.name,e);
                list.failed.push((term.name.clone(),e));
            }
        }
    }
    Ok(list)
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::annotation::{Link, Segment};
    use crate::change_table::PartyChangeRow;
    use crate::member::PartialDate;
    use crate::row_extractor::{Cell, MemberRow};

    const PAGE : &str = include_str!("test_data/term_page.html");
    const TERM : &str = "2007–2009";
    const URL : &str = "https://en.wikipedia.org/wiki/List_of_members_of_the_parliament_of_Iceland,_2007%E2%80%9309";

    fn base(name:&str,footnote_ref:Option<&str>) -> ExtractedMember {
        ExtractedMember {
            record: MemberRecord {
                name: name.to_string(),
                external_ref: "".to_string(),
                party: "Progressive Party".to_string(),
                constituency: "Northwest".to_string(),
                source_url: URL.to_string(),
                term: TERM.to_string(),
                start_date: None,
                end_date: None,
            },
            footnote_ref: footnote_ref.map(|s|s.to_string()),
        }
    }

    fn footnote(segments:Vec<Segment>) -> HashMap<String,Annotation> {
        [("#cite_note-1".to_string(),Annotation::from_segments(segments))].into_iter().collect()
    }

    fn kristinn_changes() -> PartyChangeIndex {
        PartyChangeIndex::build(vec![PartyChangeRow{ name: "Kristinn H. Gunnarsson".to_string(), new_party: "Liberal Party".to_string(), date: "2007".to_string() }]).unwrap()
    }

    #[test]
    fn test_no_footnote_no_change() {
        let records = derive_records(base("Anna Sigga",None),&HashMap::new(),&kristinn_changes()).unwrap();
        assert_eq!(1,records.len());
        assert_eq!(None,records[0].end_date);
    }

    #[test]
    fn test_change_table_alone() {
        let records = derive_records(base("Kristinn H. Gunnarsson",None),&HashMap::new(),&kristinn_changes()).unwrap();
        assert_eq!(2,records.len());
        assert_eq!(Some(PartialDate::Year(2007)),records[0].end_date);
        assert_eq!("Progressive Party",records[0].party);
        assert_eq!("Liberal Party",records[1].party);
        assert_eq!(records[0].end_date,records[1].start_date);
    }

    #[test]
    fn test_footnote_beats_change_table() {
        let notes = footnote(vec![Segment::Text("Replaced by ".to_string()),Segment::Link(Link{ text: "Jón Jónsson".to_string(), target: None }),Segment::Text(" on 5 June 2007".to_string())]);
        let records = derive_records(base("Kristinn H. Gunnarsson",Some("#cite_note-1")),&notes,&kristinn_changes()).unwrap();
        assert_eq!(2,records.len());
        let june_5 = Some(PartialDate::Full(NaiveDate::from_ymd_opt(2007,6,5).unwrap()));
        assert_eq!(june_5,records[0].end_date);
        assert_eq!("Progressive Party",records[0].party);
        assert_eq!("Jón Jónsson",records[1].name);
        assert_eq!("Progressive Party",records[1].party);
        assert_eq!(june_5,records[1].start_date);
    }

    #[test]
    fn test_unclassified_footnote_is_skipped() {
        let notes = footnote(vec![Segment::Text("Speaker of the Althing.".to_string())]);
        let records = derive_records(base("Anna Sigga",Some("#cite_note-1")),&notes,&PartyChangeIndex::default()).unwrap();
        assert_eq!(vec![base("Anna Sigga",None).record],records);
        let missing = derive_records(base("Anna Sigga",Some("#cite_note-9")),&notes,&PartyChangeIndex::default()).unwrap();
        assert_eq!(1,missing.len());
    }

    #[test]
    fn test_unparseable_date_is_fatal() {
        let notes = footnote(vec![Segment::Text("Became independent at some point".to_string())]);
        assert_eq!(Err(ExtractionError::UnparseableDate("Became independent at some point".to_string())),derive_records(base("Anna Sigga",Some("#cite_note-1")),&notes,&PartyChangeIndex::default()));
    }

    #[test]
    fn test_parse_term_page() {
        let codes : PartyCodes = [("S".to_string(),"Social Democratic Alliance".to_string())].into_iter().collect();
        let records = parse_term_page(PAGE,TERM,URL,&codes).unwrap();
        let summary : Vec<(String,String,Option<String>,Option<String>)> = records.iter().map(|r|(r.name.clone(),r.party.clone(),r.start_date.map(|d|d.to_string()),r.end_date.map(|d|d.to_string()))).collect();
        let s = |name:&str,party:&str,start:Option<&str>,end:Option<&str>| (name.to_string(),party.to_string(),start.map(|s|s.to_string()),end.map(|s|s.to_string()));
        assert_eq!(vec![
            s("Geir Haarde","Independence Party",None,Some("2009-02-01")),
            s("Illugi Gunnarsson","Independence Party",Some("2009-02-01"),None),
            s("Jón Bjarnason","Left-Green Movement",None,Some("2008")),
            s("Jón Bjarnason","Liberal Party",Some("2008"),None),
            s("Anna Sigga","Social Democratic Alliance",None,None),
            s("Kristinn H. Gunnarsson","Progressive Party",None,Some("2008")),
            s("Sigurður Pétursson","Progressive Party",Some("2008"),None),
            s("Ingibjörg Sólrún Gísladóttir","Social Democratic Alliance",None,None),
        ],summary);
        assert_eq!("https://en.wikipedia.org/wiki/Illugi_Gunnarsson",records[1].external_ref);
        assert_eq!("Reykjavík South",records[1].constituency);
        assert_eq!("",records[6].external_ref);
        assert_eq!("Reykjavík North",records[7].constituency);
        assert!(records.iter().all(|r|r.term==TERM && r.source_url==URL));
        assert!(check_continuity(&records).is_empty());
    }

    #[test]
    fn test_parse_term_page_unknown_party_code() {
        assert_eq!(Err(ExtractionError::UnknownPartyCode("S".to_string())),parse_term_page(PAGE,TERM,URL,&PartyCodes::new()));
    }

    #[test]
    fn test_parse_term_page_without_member_table() {
        assert_eq!(Err(ExtractionError::MissingExpectedTable("Constituency".to_string())),parse_term_page("<html><body><p>Moved</p></body></html>",TERM,URL,&PartyCodes::new()));
    }

    #[test]
    fn test_check_continuity() {
        let mut ended = base("Anna Sigga",None).record;
        ended.end_date = Some(PartialDate::Year(2008));
        assert_eq!(1,check_continuity(&[ended.clone()]).len());
        let mut successor = ended.clone();
        successor.party = "Independent".to_string();
        successor.start_date = Some(PartialDate::Year(2008));
        successor.end_date = None;
        assert!(check_continuity(&[ended.clone(),successor]).is_empty());
        ended.start_date = Some(PartialDate::Year(2009));
        assert_eq!(2,check_continuity(&[ended]).len());
    }

    #[test]
    fn test_create_member_list_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::embedded_default();
        config.source_dir = dir.path().to_path_buf();
        let term = config.find_term(TERM).unwrap().clone();
        std::fs::write(dir.path().join(term.file_name()),PAGE).unwrap();
        let list = create_member_list(&config,&[TERM.to_string(),"2009–2013".to_string()]).unwrap();
        assert_eq!(8,list.records.len());
        assert_eq!(7,list.store.len()); // Jón Bjarnason's second record replaces his first.
        assert_eq!("Liberal Party",list.store.get("Jón Bjarnason",TERM).unwrap().party);
        assert_eq!(1,list.failed.len());
        assert_eq!("2009–2013",list.failed[0].0);
        assert!(list.check().is_err());
        assert!(create_member_list(&config,&["1066".to_string()]).is_err());
    }

    #[test]
    fn test_cells_from_rows_are_used_verbatim() {
        let row = MemberRow { cells: vec![Cell{ text: "Anna".to_string(), ..Default::default() },Cell{ text: "Independent".to_string(), ..Default::default() },Cell{ text: "North".to_string(), ..Default::default() }] };
        let member = extract_member(&row,TERM,URL,&PartyCodes::new()).unwrap();
        assert_eq!(vec![member.record.clone()],derive_records(member,&HashMap::new(),&PartyChangeIndex::default()).unwrap());
    }
}
