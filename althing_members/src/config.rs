//! Configuration: which term pages to read, where to cache them, and how to read party codes.
//!
//! Nothing here is global; the loaded [Config] is passed to whatever needs it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context};
use serde::{Serialize,Deserialize};

pub const CONFIG_FILE_NAME: &str = "config.toml";
const EMBEDDED_DEFAULT_CONFIG : &str = include_str!("default_config.toml");

/// Map from party code, as written in `(D)`, to party name.
pub type PartyCodes = BTreeMap<String,String>;

#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct Config {
    #[serde(default = "default_wiki_base_url")]
    pub wiki_base_url : String,
    /// Downloaded term pages are kept here.
    #[serde(default = "default_source_dir")]
    pub source_dir : PathBuf,
    #[serde(default = "default_user_agent")]
    pub user_agent : String,
    #[serde(default)]
    pub party_codes : PartyCodes,
    pub terms : Vec<TermSource>,
}

fn default_wiki_base_url() -> String { "https://en.wikipedia.org".to_string() }
fn default_source_dir() -> PathBuf { PathBuf::from("data/member_source") }
fn default_user_agent() -> String { "althing-members/0.1".to_string() }

/// A legislative term and the page listing its members.
#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct TermSource {
    /// e.g. `2007–2009`
    pub name : String,
    /// Page name under `/wiki/`, already percent encoded.
    pub page : String,
    /// Overrides of the global party codes for this term.
    #[serde(default)]
    pub party_codes : PartyCodes,
}

impl TermSource {
    pub fn source_url(&self,config:&Config) -> String {
        format!("{}/wiki/{}",config.wiki_base_url.trim_end_matches('/'),self.page)
    }

    /// The name of the cached copy of the page in [Config::source_dir].
    pub fn file_name(&self) -> String {
        self.name.chars().map(|c|if c.is_alphanumeric() { c } else { '_' }).collect::<String>()+".html"
    }
}

impl Config {
    pub fn parse(text:&str) -> anyhow::Result<Config> {
        let config : Config = toml::de::from_str(text)?;
        if config.terms.is_empty() { return Err(anyhow!("No terms configured")) }
        Ok(config)
    }

    pub fn load(path:&Path) -> anyhow::Result<Config> {
        let text = fs::read_to_string(path).with_context(||format!("Could not read {}",path.display()))?;
        Config::parse(&text).with_context(||format!("Could not parse {}",path.display()))
    }

    /// The configuration built into the program.
    pub fn embedded_default() -> Config {
        Config::parse(EMBEDDED_DEFAULT_CONFIG).expect("Embedded default configuration is invalid")
    }

    /// Load the given file, or `config.toml` if it exists, or else the embedded default.
    pub fn load_or_default(path:Option<&Path>) -> anyhow::Result<Config> {
        match path {
            Some(path) => Config::load(path),
            None if Path::new(CONFIG_FILE_NAME).exists() => Config::load(Path::new(CONFIG_FILE_NAME)),
            None => Ok(Config::embedded_default()),
        }
    }

    /// The party codes to use for a term, the term's own overriding the global ones.
    pub fn party_codes_for(&self,term:&TermSource) -> PartyCodes {
        let mut codes = self.party_codes.clone();
        codes.extend(term.party_codes.iter().map(|(k,v)|(k.clone(),v.clone())));
        codes
    }

    pub fn find_term(&self,name:&str) -> Option<&TermSource> {
        self.terms.iter().find(|t|t.name==name)
    }
}
