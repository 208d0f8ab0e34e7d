//! Mid-term changes of membership, and how they turn one record into two.

use crate::member::{MemberRecord, PartialDate};

/// A change to a member's span during a term, derived from a footnote or a party change table.
/// Never stored; it only exists long enough to be applied to the record it came from.
#[derive(Debug,Clone,Eq,PartialEq)]
pub enum ChangeEvent {
    /// Someone else took over the seat.
    Replacement { date : PartialDate, name : String, external_ref : String },
    /// The member stayed but changed party.
    PartySwitch { date : PartialDate, party : String },
    /// A recognised note that deliberately does not change the record.
    Ignored { note : String },
}

#[derive(Debug,Clone,Copy,Eq,PartialEq)]
pub enum ChangeKind {
    Replacement,
    PartySwitch,
    Ignored,
}

impl ChangeEvent {
    pub fn kind(&self) -> ChangeKind {
        match self {
            ChangeEvent::Replacement { .. } => ChangeKind::Replacement,
            ChangeEvent::PartySwitch { .. } => ChangeKind::PartySwitch,
            ChangeEvent::Ignored { .. } => ChangeKind::Ignored,
        }
    }

    pub fn effective_date(&self) -> Option<PartialDate> {
        match self {
            ChangeEvent::Replacement { date, .. } | ChangeEvent::PartySwitch { date, .. } => Some(*date),
            ChangeEvent::Ignored { .. } => None,
        }
    }

    /// Whether applying this event produces a second record.
    pub fn splits_record(&self) -> bool { self.kind()!=ChangeKind::Ignored }
}

/// Apply an event to a base record, giving the (possibly ended) base record and the record that follows it, if any.
/// The successor starts on exactly the date the base record ends.
pub fn materialize(mut base:MemberRecord,event:&ChangeEvent) -> (MemberRecord,Option<MemberRecord>) {
    let successor = match event {
        ChangeEvent::Replacement { date, name, external_ref } => {
            base.end_date = Some(*date);
            Some(MemberRecord{ name: name.clone(), external_ref: external_ref.clone(), start_date: Some(*date), end_date: None, ..base.clone() })
        }
        ChangeEvent::PartySwitch { date, party } => {
            base.end_date = Some(*date);
            Some(MemberRecord{ party: party.clone(), start_date: Some(*date), end_date: None, ..base.clone() })
        }
        ChangeEvent::Ignored { .. } => None,
    };
    (base,successor)
}

/// Choose between the event from a party change table and the event from a footnote.
/// A footnote that actually changes something wins; otherwise the table entry stands.
pub fn choose_event(from_change_table:Option<ChangeEvent>,from_footnote:Option<ChangeEvent>) -> Option<ChangeEvent> {
    match from_footnote {
        Some(event) if event.splits_record() => Some(event),
        ignored => from_change_table.or(ignored),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn base() -> MemberRecord {
        MemberRecord{
            name: "Guðrún Ögmundsdóttir".to_string(),
            external_ref: "https://en.wikipedia.org/wiki/Gu%C3%B0r%C3%BAn_%C3%96gmundsd%C3%B3ttir".to_string(),
            party: "Social Democratic Alliance".to_string(),
            constituency: "Reykjavík North".to_string(),
            source_url: "https://en.wikipedia.org/wiki/List_of_members_of_the_parliament_of_Iceland,_2003%E2%80%9307".to_string(),
            term: "2003–2007".to_string(),
            start_date: None,
            end_date: None,
        }
    }

    fn june_5() -> PartialDate { PartialDate::Full(NaiveDate::from_ymd_opt(2007,6,5).unwrap()) }

    #[test]
    fn test_replacement() {
        let event = ChangeEvent::Replacement{ date: june_5(), name: "Jón Jónsson".to_string(), external_ref: "".to_string() };
        let (original,successor) = materialize(base(),&event);
        let successor = successor.unwrap();
        assert_eq!(Some(june_5()),original.end_date);
        assert_eq!(original.end_date,successor.start_date);
        assert_eq!(None,successor.end_date);
        assert_eq!("Jón Jónsson",successor.name);
        assert_eq!("",successor.external_ref);
        assert_eq!(original.party,successor.party);
        assert_eq!(original.constituency,successor.constituency);
        assert_eq!("Guðrún Ögmundsdóttir",original.name);
    }

    #[test]
    fn test_party_switch() {
        let event = ChangeEvent::PartySwitch{ date: PartialDate::Year(2009), party: "Independent".to_string() };
        let (original,successor) = materialize(base(),&event);
        let successor = successor.unwrap();
        assert_eq!(Some(PartialDate::Year(2009)),original.end_date);
        assert_eq!(Some(PartialDate::Year(2009)),successor.start_date);
        assert_eq!("Independent",successor.party);
        assert_eq!("Social Democratic Alliance",original.party);
        assert_eq!(original.name,successor.name);
    }

    #[test]
    fn test_ignored_leaves_record_alone() {
        let event = ChangeEvent::Ignored{ note: "Became Prime Minister in 2009".to_string() };
        let (original,successor) = materialize(base(),&event);
        assert_eq!(base(),original);
        assert!(successor.is_none());
        assert_eq!(None,event.effective_date());
    }

    #[test]
    fn test_footnote_beats_change_table() {
        let table = ChangeEvent::PartySwitch{ date: PartialDate::Year(2009), party: "Independent".to_string() };
        let footnote = ChangeEvent::Replacement{ date: june_5(), name: "Jón Jónsson".to_string(), external_ref: "".to_string() };
        assert_eq!(Some(footnote.clone()),choose_event(Some(table.clone()),Some(footnote.clone())));
        assert_eq!(Some(table.clone()),choose_event(Some(table.clone()),None));
        let ignored = ChangeEvent::Ignored{ note: "Became Prime Minister".to_string() };
        assert_eq!(Some(table.clone()),choose_event(Some(table),Some(ignored.clone())));
        assert_eq!(Some(ignored.clone()),choose_event(None,Some(ignored)));
        assert_eq!(None,choose_event(None,None));
    }
}
