//! Output of membership records, as flat CSV rows or as a store keyed by (name, term).

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use anyhow::Context;
use crate::member::MemberRecord;

/// Write records, in order, as CSV with a header row.
pub fn write_csv<'a>(path:&Path,records:impl IntoIterator<Item=&'a MemberRecord>) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(||format!("Could not create {}",path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Records keyed by (name, term). Storing a record whose key is already present replaces
/// the earlier record in place, so the last one written for a key is the one kept.
#[derive(Debug,Default)]
pub struct MemberStore {
    records : Vec<MemberRecord>,
    index : HashMap<(String,String),usize>,
}

impl MemberStore {
    pub fn new() -> Self { Default::default() }

    /// Store a record, returning the one it replaced if any.
    pub fn save(&mut self,record:MemberRecord) -> Option<MemberRecord> {
        let key = (record.name.clone(),record.term.clone());
        match self.index.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.records[position],record)),
            None => {
                self.index.insert(key,self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    pub fn save_all(&mut self,records:impl IntoIterator<Item=MemberRecord>) {
        for record in records {
            if let Some(replaced) = self.save(record) {
                log::debug!("Stored record replaces {}",replaced);
            }
        }
    }

    pub fn get(&self,name:&str,term:&str) -> Option<&MemberRecord> {
        self.index.get(&(name.to_string(),term.to_string())).map(|&i|&self.records[i])
    }

    pub fn records(&self) -> &[MemberRecord] { &self.records }
    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn write_json(&self,path:&Path) -> anyhow::Result<()> {
        let file = File::create(path).with_context(||format!("Could not create {}",path.display()))?;
        serde_json::to_writer_pretty(file,&self.records)?;
        Ok(())
    }

    pub fn read_json(path:&Path) -> anyhow::Result<MemberStore> {
        let file = File::open(path).with_context(||format!("Could not open {}",path.display()))?;
        let records : Vec<MemberRecord> = serde_json::from_reader(file)?;
        let mut store = MemberStore::new();
        store.save_all(records);
        Ok(store)
    }
}
