pub mod member;
pub mod error;
pub mod dates;
pub mod annotation;
pub mod change_event;
pub mod change_table;
pub mod config;
pub mod row_extractor;
pub mod term_page;
pub mod store;
pub mod parse_member_lists;
mod parse_util;

/// Set up logging for the command line programs. `RUST_LOG`, if set, overrides the verbosity flag.
pub fn init_logging(verbose:u64) {
    let level = match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(spec) = std::env::var("RUST_LOG") { builder.parse_filters(&spec); }
    builder.init();
}
