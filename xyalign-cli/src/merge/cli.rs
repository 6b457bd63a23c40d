use clap::{Arg, Command, arg};

pub const MERGE_CMD: &str = "merge";

pub fn create_merge_cli() -> Command {
    Command::new(MERGE_CMD)
        .about("Concatenate BED files and merge overlapping or adjacent intervals.")
        .arg(
            Arg::new("beds")
                .required(true)
                .num_args(1..)
                .help("BED files (plain or .gz) to combine"),
        )
        .arg(arg!(--output <OUTPUT> "Output BED file (default: stdout)").required(false))
}
