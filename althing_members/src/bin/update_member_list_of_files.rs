use std::path::PathBuf;
use althing_members::config::Config;
use althing_members::init_logging;
use althing_members::parse_member_lists::update_member_list_of_files;
use clap::Parser;

/// Download the Wikipedia lists of members of the Althing, keeping each only if it can be parsed.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(long, value_parser)]
    /// Configuration file. Defaults to config.toml if present, otherwise built in settings.
    config: Option<PathBuf>,
    #[clap(long = "term", value_parser)]
    /// Only download this term, e.g. 2007–2009. May be repeated.
    terms: Vec<String>,
    #[clap(long, action)]
    /// Only download terms that have not already been downloaded.
    missing_only: bool,
    #[clap(short, long, action = clap::ArgAction::Count)]
    /// More logging. May be repeated.
    verbose: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = Config::load_or_default(args.config.as_deref())?;
    println!("Downloading into {} and checking files",config.source_dir.display());
    update_member_list_of_files(&config,&args.terms,args.missing_only).await?;
    println!("Ran successfully");
    Ok(())
}
