use clap::{ArgAction, Parser};
use presave_config::Config;
use std::path::PathBuf;

/// Download the IMDB review corpus and a word2vec model, then save the
/// embedded reviews as ready-to-train batch files.
#[derive(Parser, Debug)]
#[command(name = "presave", version, about)]
pub struct Args {
    /// Examples per saved batch [default: 64]
    #[arg(short = 'b', long = "batch", value_name = "N", value_parser = clap::value_parser!(usize))]
    pub batch: Option<usize>,
    /// Truncate reviews to at most this many words [default: 256]
    #[arg(short = 'l', long = "length", value_name = "N", value_parser = clap::value_parser!(usize))]
    pub length: Option<usize>,
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Download the word2vec model without asking first
    #[arg(short = 'y', long = "yes", action = ArgAction::SetTrue)]
    pub yes: bool,
    /// More logging; repeat for even more
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Flags take precedence over every configuration layer.
    pub fn apply(&self, config: &mut Config) {
        if let Some(batch) = self.batch {
            config.batch_size = batch;
        }
        if let Some(length) = self.length {
            config.max_length = length;
        }
    }

    /// Filter used when `RUST_LOG` is not set.
    pub fn default_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind as ClapErrorKind;
    use presave_config::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_LENGTH};
    use rstest::rstest;
    use std::path::Path;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("presave").chain(args.iter().copied()))
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let args = parse(&[]).unwrap();
        let mut config = Config::defaults(Path::new("/home/user"), Path::new("/tmp"));
        args.apply(&mut config);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.max_length, DEFAULT_MAX_LENGTH);
        assert!(!args.yes);
        assert_eq!(args.default_filter(), "info");
    }

    #[rstest]
    #[case(&["-b", "32", "-l", "100"])]
    #[case(&["--batch", "32", "--length", "100"])]
    #[case(&["--batch=32", "--length=100"])]
    fn test_flags_override(#[case] flags: &[&str]) {
        let args = parse(flags).unwrap();
        let mut config = Config::defaults(Path::new("/home/user"), Path::new("/tmp"));
        args.apply(&mut config);
        assert_eq!(config.batch_size, 32);
        assert_eq!(config.max_length, 100);
    }

    #[test]
    fn test_flags_override_invalid_layers() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("presave.toml", "max_length = 0")?;
            jail.set_env("PRESAVE_BATCH_SIZE", 0);
            let defaults = Config::defaults(&jail.directory().join("home"), &jail.directory().join("tmp"));
            let mut config =
                Config::from_layers(defaults, Some(Path::new("presave.toml"))).map_err(|e| e.to_string())?;

            parse(&["-b", "32", "-l", "100"]).map_err(|e| e.to_string())?.apply(&mut config);

            assert_eq!(config.batch_size, 32);
            assert_eq!(config.max_length, 100);
            config.validate().map_err(|e| e.to_string())?;
            Ok(())
        });
    }

    #[rstest]
    #[case(&["-v"], "debug")]
    #[case(&["-vv"], "trace")]
    #[case(&["-v", "-v", "-v"], "trace")]
    fn test_verbosity(#[case] flags: &[&str], #[case] expected: &str) {
        assert_eq!(parse(flags).unwrap().default_filter(), expected);
    }

    #[rstest]
    #[case(&["--batch", "lots"])]
    #[case(&["--length", "-1"])]
    #[case(&["--unknown"])]
    fn test_invalid(#[case] flags: &[&str]) {
        assert!(parse(flags).is_err());
    }

    #[rstest]
    #[case(&["--help"], ClapErrorKind::DisplayHelp)]
    #[case(&["--version"], ClapErrorKind::DisplayVersion)]
    fn test_informational(#[case] flags: &[&str], #[case] expected: ClapErrorKind) {
        assert_eq!(parse(flags).unwrap_err().kind(), expected);
    }
}
