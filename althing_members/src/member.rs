//! Membership records - one span of one person sitting in the Althing for some term.


use std::cmp::Ordering;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use anyhow::anyhow;
use chrono::{Datelike, NaiveDate};
use serde::{Serialize,Deserialize};

/// How precisely a date in a [MemberRecord] is known.
#[derive(Debug,Clone,Copy,Serialize,Deserialize,Eq,PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum DatePrecision {
    Full,
    YearOnly,
    Unknown,
}

/// A date which may only be known to the nearest year.
/// Written as `2007-06-05` or just `2007`.
#[derive(Debug,Clone,Copy,Eq,PartialEq,Hash,serde_with::SerializeDisplay,serde_with::DeserializeFromStr)]
pub enum PartialDate {
    Full(NaiveDate),
    Year(i32),
}

impl PartialDate {
    pub fn precision(&self) -> DatePrecision {
        match self {
            PartialDate::Full(_) => DatePrecision::Full,
            PartialDate::Year(_) => DatePrecision::YearOnly,
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            PartialDate::Full(date) => date.year(),
            PartialDate::Year(year) => *year,
        }
    }

    /// Compare at the coarser of the two precisions, so `2007` is neither before nor after `2007-06-05`.
    pub fn cmp_coarse(&self,other:&PartialDate) -> Ordering {
        match (self,other) {
            (PartialDate::Full(a),PartialDate::Full(b)) => a.cmp(b),
            _ => self.year().cmp(&other.year()),
        }
    }
}

impl Display for PartialDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PartialDate::Full(date) => write!(f,"{}",date.format("%Y-%m-%d")),
            PartialDate::Year(year) => write!(f,"{:04}",year),
        }
    }
}

impl FromStr for PartialDate {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len()==4 && s.chars().all(|c|c.is_ascii_digit()) {
            Ok(PartialDate::Year(s.parse()?))
        } else {
            NaiveDate::parse_from_str(s,"%Y-%m-%d").map(PartialDate::Full).map_err(|e|anyhow!("Could not interpret {} as a date : {}",s,e))
        }
    }
}

/// The precision of an optional date, [DatePrecision::Unknown] when there is no date.
pub fn precision_of(date:&Option<PartialDate>) -> DatePrecision {
    date.as_ref().map(|d|d.precision()).unwrap_or(DatePrecision::Unknown)
}

/// One span of membership.
/// `end_date` is only set when the span finished before the natural end of the term.
/// Field order is the order of the flat output rows.
#[derive(Serialize,Deserialize,Debug,Clone,Eq,PartialEq)]
pub struct MemberRecord {
    pub name : String,
    /// Link to the person's own page, or empty if they do not have one.
    #[serde(rename = "wikipedia")]
    pub external_ref : String,
    pub party : String,
    pub constituency : String,
    /// The page this record was extracted from.
    #[serde(rename = "source")]
    pub source_url : String,
    pub term : String,
    pub start_date : Option<PartialDate>,
    pub end_date : Option<PartialDate>,
}

impl MemberRecord {
    /// The natural key used when storing records.
    pub fn key(&self) -> (&str,&str) { (&self.name,&self.term) }

    pub fn start_precision(&self) -> DatePrecision { precision_of(&self.start_date) }
    pub fn end_precision(&self) -> DatePrecision { precision_of(&self.end_date) }

    /// false if both dates are known and the start is after the end.
    pub fn span_is_ordered(&self) -> bool {
        match (&self.start_date,&self.end_date) {
            (Some(start),Some(end)) => start.cmp_coarse(end)!=Ordering::Greater,
            _ => true,
        }
    }
}

impl Display for MemberRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f,"{} ({}) for {} in {}",self.name,self.party,self.constituency,self.term)?;
        match (&self.start_date,&self.end_date) {
            (None,None) => Ok(()),
            (start,end) => write!(f," from {} to {}",start.map(|d|d.to_string()).unwrap_or_default(),end.map(|d|d.to_string()).unwrap_or_default()),
        }
    }
}
