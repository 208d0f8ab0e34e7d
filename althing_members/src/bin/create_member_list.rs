use std::path::PathBuf;
use althing_members::config::Config;
use althing_members::init_logging;
use althing_members::parse_member_lists::create_member_list;
use althing_members::store::write_csv;
use clap::Parser;

/// Extract membership records from the downloaded term pages.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(long, value_parser)]
    /// Configuration file. Defaults to config.toml if present, otherwise built in settings.
    config: Option<PathBuf>,
    #[clap(long, value_parser)]
    /// Where to write every record as CSV. Defaults to members.csv in the source directory.
    csv: Option<PathBuf>,
    #[clap(long, value_parser)]
    /// Where to write the records keyed by name and term as JSON. Defaults to members.json in the source directory.
    json: Option<PathBuf>,
    #[clap(long = "term", value_parser)]
    /// Only process this term, e.g. 2007–2009. May be repeated.
    terms: Vec<String>,
    #[clap(short, long, action = clap::ArgAction::Count)]
    /// More logging. May be repeated.
    verbose: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = Config::load_or_default(args.config.as_deref())?;
    println!("Reading term pages from {}",config.source_dir.display());
    let list = create_member_list(&config,&args.terms)?;
    let csv = args.csv.unwrap_or_else(||config.source_dir.join("members.csv"));
    let json = args.json.unwrap_or_else(||config.source_dir.join("members.json"));
    println!("Writing {} records to {} and {} to {}",list.records.len(),csv.display(),list.store.len(),json.display());
    write_csv(&csv,&list.records)?;
    list.store.write_json(&json)?;
    list.check()?;
    println!("Ran successfully");
    Ok(())
}
