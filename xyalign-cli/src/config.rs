use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use xyalign_coverage::{ClassifyParams, ReadFilter};
use xyalign_ploidy::{InferenceSettings, SexChromosomes};

pub const DEFAULT_WINDOW_SIZE: u64 = 50_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

///
/// Every setting of an `analyze` run.
///
/// Built once from an optional TOML file, then CLI flags, then validated.
/// Missing keys take the defaults below. An empty `y_chromosome` means the
/// reference has no Y.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub bam: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub sample_id: String,
    pub chromosomes: Vec<String>,
    pub x_chromosome: String,
    pub y_chromosome: Option<String>,
    pub window_size: Option<u64>,
    pub target_bed: Option<PathBuf>,
    pub mapq_cutoff: f64,
    pub depth_filter: f64,
    pub num_permutations: usize,
    pub num_bootstraps: usize,
    pub y_present: bool,
    pub y_absent: bool,
    pub no_perm_test: bool,
    pub seed: Option<u64>,
    pub cpus: usize,
    pub vcf: Option<PathBuf>,
    pub variant_quality_cutoff: f64,
    pub include_duplicates: bool,
    pub include_secondary: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            bam: None,
            output_dir: PathBuf::from("xyalign_output"),
            sample_id: "sample".to_string(),
            chromosomes: vec!["chrX".to_string(), "chrY".to_string(), "chr19".to_string()],
            x_chromosome: "chrX".to_string(),
            y_chromosome: Some("chrY".to_string()),
            window_size: None,
            target_bed: None,
            mapq_cutoff: 20.0,
            depth_filter: 4.0,
            num_permutations: 10_000,
            num_bootstraps: 10_000,
            y_present: false,
            y_absent: false,
            no_perm_test: false,
            seed: None,
            cpus: 1,
            vcf: None,
            variant_quality_cutoff: 20.0,
            include_duplicates: false,
            include_secondary: false,
        }
    }
}

impl TryFrom<&Path> for AnalysisConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> ConfigResult<Self> {
        let toml_str = read_to_string(path)?;
        let config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}

impl AnalysisConfig {
    ///
    /// Build the final configuration for `analyze`: the `--config` file if
    /// given (defaults otherwise), overridden by any flags on the command
    /// line, then normalized and validated.
    ///
    pub fn from_matches(matches: &ArgMatches) -> ConfigResult<Self> {
        let mut config = match matches.get_one::<String>("config") {
            Some(path) => AnalysisConfig::try_from(Path::new(path))?,
            None => AnalysisConfig::default(),
        };
        config.apply_matches(matches);
        config.finalize()
    }

    fn apply_matches(&mut self, matches: &ArgMatches) {
        if let Some(bam) = matches.get_one::<String>("bam") {
            self.bam = Some(PathBuf::from(bam));
        }
        if let Some(dir) = matches.get_one::<String>("output-dir") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(id) = matches.get_one::<String>("sample-id") {
            self.sample_id = id.clone();
        }
        if let Some(chroms) = matches.get_many::<String>("chromosomes") {
            self.chromosomes = chroms.cloned().collect();
        }
        if let Some(x) = matches.get_one::<String>("x-chromosome") {
            self.x_chromosome = x.clone();
        }
        if let Some(y) = matches.get_one::<String>("y-chromosome") {
            self.y_chromosome = Some(y.clone());
        }
        if matches.get_flag("no-y") {
            self.y_chromosome = None;
        }
        if let Some(size) = matches.get_one::<u64>("window-size") {
            self.window_size = Some(*size);
        }
        if let Some(bed) = matches.get_one::<String>("target-bed") {
            self.target_bed = Some(PathBuf::from(bed));
        }
        if let Some(cutoff) = matches.get_one::<f64>("mapq-cutoff") {
            self.mapq_cutoff = *cutoff;
        }
        if let Some(factor) = matches.get_one::<f64>("depth-filter") {
            self.depth_filter = *factor;
        }
        if let Some(n) = matches.get_one::<usize>("num-permutations") {
            self.num_permutations = *n;
        }
        if let Some(n) = matches.get_one::<usize>("num-bootstraps") {
            self.num_bootstraps = *n;
        }
        if let Some(seed) = matches.get_one::<u64>("seed") {
            self.seed = Some(*seed);
        }
        if let Some(cpus) = matches.get_one::<usize>("cpus") {
            self.cpus = *cpus;
        }
        if let Some(vcf) = matches.get_one::<String>("vcf") {
            self.vcf = Some(PathBuf::from(vcf));
        }
        if let Some(cutoff) = matches.get_one::<f64>("variant-quality-cutoff") {
            self.variant_quality_cutoff = *cutoff;
        }

        // switches can only turn things on
        self.y_present |= matches.get_flag("y-present");
        self.y_absent |= matches.get_flag("y-absent");
        self.no_perm_test |= matches.get_flag("no-perm-test");
        self.include_duplicates |= matches.get_flag("include-duplicates");
        self.include_secondary |= matches.get_flag("include-secondary");
    }

    /// Fill derived defaults, then validate.
    pub fn finalize(mut self) -> ConfigResult<Self> {
        if self.y_chromosome.as_deref() == Some("") {
            self.y_chromosome = None;
        }
        if self.window_size.is_none() && self.target_bed.is_none() {
            self.window_size = Some(DEFAULT_WINDOW_SIZE);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        match (self.window_size, &self.target_bed) {
            (Some(_), Some(_)) => return invalid("window_size and target_bed are mutually exclusive"),
            (None, None) => return invalid("one of window_size or target_bed is required"),
            (Some(0), None) => return invalid("window_size must be positive"),
            _ => {}
        }
        if self.y_present && self.y_absent {
            return invalid("y_present and y_absent are mutually exclusive");
        }
        if self.no_perm_test && !(self.y_present || self.y_absent) {
            return invalid("no_perm_test requires either y_present or y_absent");
        }
        if !self.no_perm_test && (self.num_permutations == 0 || self.num_bootstraps == 0) {
            return invalid("num_permutations and num_bootstraps must be positive");
        }
        if self.cpus == 0 {
            return invalid("cpus must be at least 1");
        }
        if self.chromosomes.is_empty() {
            return invalid("at least one chromosome is required");
        }
        if !self.chromosomes.contains(&self.x_chromosome) {
            return Err(ConfigError::Invalid(format!(
                "x_chromosome '{}' is not among the analyzed chromosomes",
                self.x_chromosome
            )));
        }
        if let Some(y) = &self.y_chromosome {
            if !self.chromosomes.contains(y) {
                return Err(ConfigError::Invalid(format!(
                    "y_chromosome '{}' is not among the analyzed chromosomes",
                    y
                )));
            }
        }
        Ok(())
    }

    pub fn classify_params(&self) -> ClassifyParams {
        ClassifyParams {
            mapq_cutoff: self.mapq_cutoff,
            depth_filter: self.depth_filter,
        }
    }

    pub fn read_filter(&self) -> ReadFilter {
        ReadFilter {
            include_duplicates: self.include_duplicates,
            include_secondary: self.include_secondary,
        }
    }

    pub fn inference_settings(&self) -> InferenceSettings {
        InferenceSettings {
            num_permutations: self.num_permutations,
            num_bootstraps: self.num_bootstraps,
            seed: self.seed,
        }
    }

    pub fn sex_chromosomes(&self) -> SexChromosomes {
        SexChromosomes {
            x: self.x_chromosome.clone(),
            y: self.y_chromosome.clone(),
        }
    }

    /// `Some(present)` when the Y call is forced by the user.
    pub fn presence_override(&self) -> Option<bool> {
        match (self.y_present, self.y_absent) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
