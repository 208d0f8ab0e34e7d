//! Party change tables. Some term pages list party changes explicitly, in a table with a
//! "New party" column, rather than (or as well as) in footnotes.

use std::collections::HashMap;
use crate::change_event::ChangeEvent;
use crate::dates::resolve_table_date;
use crate::error::ExtractionError;
use crate::member::PartialDate;

/// One row of a party change table, as text.
#[derive(Debug,Clone,Eq,PartialEq)]
pub struct PartyChangeRow {
    pub name : String,
    pub new_party : String,
    pub date : String,
}

#[derive(Debug,Clone,Eq,PartialEq)]
pub struct PartyChange {
    pub date : PartialDate,
    pub new_party : String,
}

/// Party changes by member name. Built once per page.
#[derive(Debug,Clone,Default)]
pub struct PartyChangeIndex {
    changes : HashMap<String,PartyChange>,
}

impl PartyChangeIndex {
    /// Index the rows of a party change table. A later row for the same name replaces an earlier one.
    pub fn build(rows:impl IntoIterator<Item=PartyChangeRow>) -> Result<Self,ExtractionError> {
        let mut changes = HashMap::new();
        for row in rows {
            let date = resolve_table_date(&row.date)?;
            if let Some(previous) = changes.insert(row.name.clone(),PartyChange { date, new_party: row.new_party }) {
                log::debug!("Party change table lists {} more than once, dropping change to {}",row.name,previous.new_party);
            }
        }
        Ok(PartyChangeIndex { changes })
    }

    pub fn len(&self) -> usize { self.changes.len() }
    pub fn is_empty(&self) -> bool { self.changes.is_empty() }

    pub fn get(&self,name:&str) -> Option<&PartyChange> { self.changes.get(name) }

    /// The party switch implied for a member, if they are in the table.
    pub fn event_for(&self,name:&str) -> Option<ChangeEvent> {
        self.get(name).map(|change|ChangeEvent::PartySwitch { date: change.date, party: change.new_party.clone() })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(name:&str,new_party:&str,date:&str) -> PartyChangeRow {
        PartyChangeRow { name: name.to_string(), new_party: new_party.to_string(), date: date.to_string() }
    }

    #[test]
    fn test_index() {
        let index = PartyChangeIndex::build(vec![
            row("Kristinn H. Gunnarsson","Liberal Party","2007"),
            row("Þráinn Bertelsson","Left-Green Movement","12 March 2009"),
        ]).unwrap();
        assert_eq!(2,index.len());
        assert_eq!(Some(ChangeEvent::PartySwitch{ date: PartialDate::Year(2007), party: "Liberal Party".to_string() }),index.event_for("Kristinn H. Gunnarsson"));
        assert_eq!(Some(PartialDate::Full(NaiveDate::from_ymd_opt(2009,3,12).unwrap())),index.get("Þráinn Bertelsson").map(|c|c.date));
        assert_eq!(None,index.event_for("Nobody"));
    }

    #[test]
    fn test_later_row_wins() {
        let index = PartyChangeIndex::build(vec![row("A","First","2001"),row("A","Second","2002")]).unwrap();
        assert_eq!(1,index.len());
        assert_eq!("Second",index.get("A").unwrap().new_party);
    }

    #[test]
    fn test_bad_date() {
        assert_eq!(Err(ExtractionError::UnparseableDate("sometime".to_string())),PartyChangeIndex::build(vec![row("A","B","sometime")]).map(|i|i.len()));
    }
}
