use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vex")]
#[command(about = "Interactive REPL for VEX robotics competition data")]
#[command(version)]
pub struct Args {
    /// Config file to load (.toml or .json)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Team number to start with (overrides current_team)
    #[arg(short = 't', long)]
    pub team: Option<String>,

    /// Suppress the banner and goodbye message
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "vex",
            "--config",
            "/tmp/vex.json",
            "-t",
            "750B",
            "-q",
            "--no-color",
        ])
        .unwrap();

        assert_eq!(args.config, Some(PathBuf::from("/tmp/vex.json")));
        assert_eq!(args.team.as_deref(), Some("750B"));
        assert!(args.quiet);
        assert!(args.no_color);
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["vex"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.team.is_none());
        assert!(!args.quiet);
        assert!(!args.no_color);
    }

    #[test]
    fn test_rejects_positional() {
        assert!(Args::try_parse_from(["vex", "750B"]).is_err());
    }
}
