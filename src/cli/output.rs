pub use fll_scoring_core::format::OutputFormat;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::ValueEnum;
use fll_scoring_core::ranking::Grouping;

/// Parser for `--format`
///
/// `OutputFormat` lives in the core crate, so clap gets a possible-values
/// parser mapped through its `FromStr` impl.
pub fn format_parser() -> impl TypedValueParser<Value = OutputFormat> {
    PossibleValuesParser::new(["human", "json", "records"]).try_map(|s| s.parse::<OutputFormat>())
}

/// Command-line spelling of a ranking group
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupingArg {
    /// Award group
    Award,
    /// Judging group
    Judging,
}

impl From<GroupingArg> for Grouping {
    fn from(arg: GroupingArg) -> Self {
        match arg {
            GroupingArg::Award => Grouping::AwardGroup,
            GroupingArg::Judging => Grouping::JudgingGroup,
        }
    }
}
