#![forbid(unsafe_code)]

//! Command-line argument parsing for the showcase binary.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.

use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
VeriScan Showcase — product page with a simulated scan demo

USAGE:
    veriscan-demo [OPTIONS]

OPTIONS:
    --headless        Run the deterministic scripted walkthrough and exit
    --scan-ms=N       Simulated scan duration in milliseconds (default: 3000)
    --close-ms=N      Dialog closing transition in milliseconds (default: 300)
    --no-observer     Pretend viewport observation is unavailable
    --width=N         Screen width for headless mode (default: 80)
    --height=N        Screen height for headless mode (default: 24)
    --help, -h        Show this help message
    --version, -V     Show version

KEYBINDINGS:
    d               Launch the demo scan dialog
    r               Scan another (from the result view)
    Esc             Dismiss the dialog / close the nav menu
    m               Toggle the nav menu
    1-5             Jump to a section
    Up/Down/PgUp/PgDn/Home/End
                    Scroll the page
    q / Ctrl+C      Quit

ENVIRONMENT VARIABLES:
    VERISCAN_LOG           tracing filter for diagnostics on stderr
    VERISCAN_NO_OBSERVER   same effect as --no-observer
";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Run the scripted walkthrough instead of the interactive terminal.
    pub headless: bool,
    /// Simulated scan duration in milliseconds.
    pub scan_ms: u64,
    /// Closing-transition duration in milliseconds.
    pub close_ms: u64,
    /// Force the no-viewport-observation degraded path.
    pub no_observer: bool,
    /// Screen width for headless mode.
    pub width: u16,
    /// Screen height for headless mode.
    pub height: u16,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            headless: false,
            scan_ms: 3000,
            close_ms: 300,
            no_observer: false,
            width: 80,
            height: 24,
        }
    }
}

/// Outcome of parsing: options, or an informational request.
#[derive(Debug, PartialEq, Eq)]
enum Parsed {
    Opts(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse process arguments, exiting on `--help`, `--version`, or error.
    #[must_use]
    pub fn parse() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        match parse_args(&args) {
            Ok(Parsed::Opts(opts)) => opts,
            Ok(Parsed::Help) => {
                print!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Parsed::Version) => {
                println!("veriscan-demo {VERSION}");
                process::exit(0);
            }
            Err(message) => {
                eprintln!("error: {message}");
                eprintln!("run with --help for usage");
                process::exit(2);
            }
        }
    }
}

fn parse_args(args: &[String]) -> Result<Parsed, String> {
    let mut opts = Opts::default();

    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Parsed::Help),
            "--version" | "-V" => return Ok(Parsed::Version),
            "--headless" => opts.headless = true,
            "--no-observer" => opts.no_observer = true,
            _ => {
                if let Some(value) = arg.strip_prefix("--scan-ms=") {
                    opts.scan_ms = parse_number(value, "--scan-ms")?;
                } else if let Some(value) = arg.strip_prefix("--close-ms=") {
                    opts.close_ms = parse_number(value, "--close-ms")?;
                } else if let Some(value) = arg.strip_prefix("--width=") {
                    opts.width = parse_number(value, "--width")?;
                } else if let Some(value) = arg.strip_prefix("--height=") {
                    opts.height = parse_number(value, "--height")?;
                } else {
                    return Err(format!("unknown option: {arg}"));
                }
            }
        }
    }

    if opts.width == 0 || opts.height == 0 {
        return Err("screen size must be non-zero".to_string());
    }

    Ok(Parsed::Opts(opts))
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("invalid value for {flag}: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_with_no_args() {
        assert_eq!(parse_args(&[]).unwrap(), Parsed::Opts(Opts::default()));
    }

    #[test]
    fn flags_combine() {
        let parsed = parse_args(&args(&[
            "--headless",
            "--scan-ms=500",
            "--close-ms=50",
            "--no-observer",
            "--width=100",
            "--height=30",
        ]))
        .unwrap();
        assert_eq!(
            parsed,
            Parsed::Opts(Opts {
                headless: true,
                scan_ms: 500,
                close_ms: 50,
                no_observer: true,
                width: 100,
                height: 30,
            })
        );
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(parse_args(&args(&["--help"])).unwrap(), Parsed::Help);
        assert_eq!(parse_args(&args(&["-h"])).unwrap(), Parsed::Help);
        assert_eq!(parse_args(&args(&["--version"])).unwrap(), Parsed::Version);
        assert_eq!(parse_args(&args(&["-V"])).unwrap(), Parsed::Version);
    }

    #[test]
    fn unknown_option_is_an_error() {
        assert!(parse_args(&args(&["--mouse"])).is_err());
    }

    #[test]
    fn bad_number_is_an_error() {
        assert!(parse_args(&args(&["--scan-ms=soon"])).is_err());
    }

    #[test]
    fn zero_size_is_an_error() {
        assert!(parse_args(&args(&["--width=0"])).is_err());
    }
}
