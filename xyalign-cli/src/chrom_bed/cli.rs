use clap::{Arg, ArgGroup, Command, arg};

pub const CHROM_BED_CMD: &str = "chrom-bed";

pub fn create_chrom_bed_cli() -> Command {
    Command::new(CHROM_BED_CMD)
        .about("Write a BED file with one whole-chromosome interval per requested chromosome.")
        .arg(arg!(--bam <BAM> "Indexed BAM whose header provides chromosome lengths").required(false))
        .arg(
            Arg::new("chrom-sizes")
                .long("chrom-sizes")
                .help("Path to chrom.sizes file"),
        )
        .group(
            ArgGroup::new("lengths")
                .args(["bam", "chrom-sizes"])
                .required(true),
        )
        .arg(
            Arg::new("chromosomes")
                .long("chromosomes")
                .required(true)
                .num_args(1..)
                .help("Chromosomes to include"),
        )
        .arg(arg!(--output <OUTPUT> "Output BED file (default: stdout)").required(false))
}
