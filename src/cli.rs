use clap::Parser;

/// Command line interface for the application
#[derive(Parser)]
pub struct Cli {
    /// Sets the logging verbosity level for the application
    /// Possible values: "error", "warn", "info", "debug", "trace"
    /// Default: "info"
    #[arg(long, default_value_t = String::from("info"))]
    pub logging_level: String,

    /// Port the polling API listens on
    #[arg(long, default_value_t = 3000)]
    pub api_port: u16,

    /// Disable the HTTP polling API; the process only runs the seeded
    /// workload, if any, and exits
    #[arg(long, default_value_t = false)]
    pub no_api: bool,

    /// Seed the pool with a sample workload so the endpoints have
    /// something to show
    #[arg(long, default_value_t = false)]
    pub demo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_is_enabled_by_default() {
        let cli = Cli::try_parse_from(["taskpool"]).unwrap();
        assert!(!cli.no_api);
        assert!(!cli.demo);
        assert_eq!(cli.api_port, 3000);
        assert_eq!(cli.logging_level, "info");
    }

    #[test]
    fn no_api_toggle_parses() {
        let cli = Cli::try_parse_from(["taskpool", "--no-api", "--api-port", "8080"]).unwrap();
        assert!(cli.no_api);
        assert_eq!(cli.api_port, 8080);
    }
}
