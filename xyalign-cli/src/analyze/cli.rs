use clap::{Arg, ArgAction, Command, arg, value_parser};

pub const ANALYZE_CMD: &str = "analyze";

pub fn create_analyze_cli() -> Command {
    Command::new(ANALYZE_CMD)
        .about("Scan coverage and mapping quality in windows, classify windows, and call Y presence.")
        .arg(arg!(--config <CONFIG> "TOML file with analysis settings; flags override it").required(false))
        .arg(arg!(--bam <BAM> "Coordinate-sorted, indexed BAM file").required(false))
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .short('o')
                .help("Directory for bed files, window tables and results"),
        )
        .arg(Arg::new("sample-id").long("sample-id").help("Prefix for output file names"))
        .arg(
            Arg::new("chromosomes")
                .long("chromosomes")
                .num_args(1..)
                .help("Chromosomes to analyze, including the sex chromosomes"),
        )
        .arg(Arg::new("x-chromosome").long("x-chromosome").help("Name of the X chromosome"))
        .arg(Arg::new("y-chromosome").long("y-chromosome").help("Name of the Y chromosome"))
        .arg(
            Arg::new("no-y")
                .long("no-y")
                .action(ArgAction::SetTrue)
                .conflicts_with("y-chromosome")
                .help("The reference has no Y chromosome"),
        )
        .arg(
            Arg::new("window-size")
                .long("window-size")
                .value_parser(value_parser!(u64))
                .help("Fixed window width in bases (default 50000 when no target bed is given)"),
        )
        .arg(
            Arg::new("target-bed")
                .long("target-bed")
                .help("BED file of target intervals to use as windows instead of fixed tiling"),
        )
        .arg(
            Arg::new("mapq-cutoff")
                .long("mapq-cutoff")
                .value_parser(value_parser!(f64))
                .help("Minimum mean mapping quality of a high-quality window [default: 20]"),
        )
        .arg(
            Arg::new("depth-filter")
                .long("depth-filter")
                .value_parser(value_parser!(f64))
                .help("Windows must lie within mean +/- f*sqrt(mean) depth [default: 4]"),
        )
        .arg(
            Arg::new("num-permutations")
                .long("num-permutations")
                .value_parser(value_parser!(usize))
                .help("Permutations per comparison [default: 10000]"),
        )
        .arg(
            Arg::new("num-bootstraps")
                .long("num-bootstraps")
                .value_parser(value_parser!(usize))
                .help("Bootstrap replicates per comparison [default: 10000]"),
        )
        .arg(
            Arg::new("y-present")
                .long("y-present")
                .action(ArgAction::SetTrue)
                .help("Skip inference and treat Y as present"),
        )
        .arg(
            Arg::new("y-absent")
                .long("y-absent")
                .action(ArgAction::SetTrue)
                .help("Skip inference and treat Y as absent"),
        )
        .arg(
            Arg::new("no-perm-test")
                .long("no-perm-test")
                .action(ArgAction::SetTrue)
                .help("Do not run any statistics (requires --y-present or --y-absent)"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .help("Seed for permutation and bootstrap sampling"),
        )
        .arg(
            Arg::new("cpus")
                .long("cpus")
                .short('p')
                .value_parser(value_parser!(usize))
                .help("Number of chromosomes scanned in parallel [default: 1]"),
        )
        .arg(arg!(--vcf <VCF> "Variant calls with TR/TC INFO fields, for read balance").required(false))
        .arg(
            Arg::new("variant-quality-cutoff")
                .long("variant-quality-cutoff")
                .value_parser(value_parser!(f64))
                .help("Minimum QUAL of variant sites used for read balance [default: 20]"),
        )
        .arg(
            Arg::new("include-duplicates")
                .long("include-duplicates")
                .action(ArgAction::SetTrue)
                .help("Count reads flagged as duplicates"),
        )
        .arg(
            Arg::new("include-secondary")
                .long("include-secondary")
                .action(ArgAction::SetTrue)
                .help("Count secondary alignments"),
        )
}
