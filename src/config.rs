//! Configuration for loading and crushing ATF corpora

/// Output format for rendered datasets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// How crush assigns a table that matches more than one group predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CrushPolicy {
    /// The table is merged into every matching group, duplicating its rows
    /// across groups.
    #[default]
    AllMatches,
    /// The table joins only the first matching group, in declaration order.
    FirstMatch,
}

impl std::str::FromStr for CrushPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "all-matches" => Ok(CrushPolicy::AllMatches),
            "first" | "first-match" => Ok(CrushPolicy::FirstMatch),
            _ => Err(format!("Unknown crush policy: {}", s)),
        }
    }
}

/// Configuration for corpus loading and regrouping.
#[derive(Debug, Clone)]
pub struct Config {
    /// Filename suffix selecting source files in a directory load.
    pub extension: String,
    /// Number of metadata lines preceding the header in each file.
    pub metadata_lines: usize,
    /// Multi-membership policy for crush.
    pub crush_policy: CrushPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extension: ".atf".to_string(),
            metadata_lines: crate::parser::METADATA_LINES,
            crush_policy: CrushPolicy::default(),
        }
    }
}

impl Config {
    /// Set the filename suffix filter.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set the metadata prefix length.
    pub fn with_metadata_lines(mut self, lines: usize) -> Self {
        self.metadata_lines = lines;
        self
    }

    /// Set the crush multi-membership policy.
    pub fn with_crush_policy(mut self, policy: CrushPolicy) -> Self {
        self.crush_policy = policy;
        self
    }
}
