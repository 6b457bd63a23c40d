mod analyze;
mod chrom_bed;
mod config;
mod merge;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use env_logger::Env;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "xyalign";
    pub const BIN_NAME: &str = "xyalign";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Infer sex-chromosome ploidy from windowed depth and mapping quality of sequencing alignments.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug messages (RUST_LOG takes precedence)"),
        )
        .subcommand(analyze::cli::create_analyze_cli())
        .subcommand(merge::cli::create_merge_cli())
        .subcommand(chrom_bed::cli::create_chrom_bed_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    let default_level = match matches.get_flag("verbose") {
        true => "debug",
        false => "info",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();
    log::debug!("{} v{}", consts::PKG_NAME, consts::VERSION);

    match matches.subcommand() {
        //
        // ANALYZE
        //
        Some((analyze::cli::ANALYZE_CMD, matches)) => {
            analyze::handlers::run_analyze(matches)?;
        }

        //
        // MERGE
        //
        Some((merge::cli::MERGE_CMD, matches)) => {
            merge::handlers::run_merge(matches)?;
        }

        //
        // CHROMOSOME BED
        //
        Some((chrom_bed::cli::CHROM_BED_CMD, matches)) => {
            chrom_bed::handlers::run_chrom_bed(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
