use clap::Parser;

use crate::report::ReportOptions;

#[derive(Debug, Parser)]
#[command(name = "amginspect", version, about = "Show the structure of AmigaOS Hunk executables")]
pub struct Args {
    #[arg(value_name = "FILE")]
    pub input: Option<String>,

    /// Long words per row in code dumps.
    #[arg(short = 'w', long = "words-per-line", default_value_t = 4)]
    pub words_per_line: usize,

    #[arg(long = "verbose", short = 'v')]
    pub verbose: bool,
}

impl Args {
    #[must_use]
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            long_words_per_line: self.words_per_line,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Args;

    #[test]
    fn parses_defaults() {
        let args = Args::parse_from(["amginspect", "prog"]);
        assert_eq!(args.input.as_deref(), Some("prog"));
        assert_eq!(args.report_options().long_words_per_line, 4);
        assert!(!args.verbose);
    }

    #[test]
    fn parses_row_width_and_verbose() {
        let args = Args::parse_from(["amginspect", "-v", "-w", "8", "prog"]);
        assert_eq!(args.words_per_line, 8);
        assert!(args.verbose);
    }

    #[test]
    fn accepts_a_missing_input_file() {
        let args = Args::try_parse_from(["amginspect"]).expect("usage is printed by run");
        assert_eq!(args.input, None);
    }
}
