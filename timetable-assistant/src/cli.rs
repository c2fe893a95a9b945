use std::env;
use std::net::SocketAddr;
use std::process;
use std::str::FromStr;

use getopts::{Matches, Options};
use tokio::time::Duration;

use crate::gemini;

/// What the summary prompt is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummarySource {
    /// The uploaded file, verbatim.
    #[default]
    Raw,
    /// Events extracted from the file, re-rendered as iCalendar text.
    Events,
}

impl FromStr for SummarySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Self::Raw),
            "events" => Ok(Self::Events),
            other => Err(format!("expected `raw` or `events`, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub address: SocketAddr,
    pub session_ttl: Duration,
    pub model: String,
    pub timeout: Duration,
    pub summary_source: SummarySource,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "a",
        "address",
        "Socket address (IP and port) to listen on [Default: 127.0.0.1:8080]",
        "SOCKET_ADDRESS",
    );
    opts.optopt(
        "t",
        "session-ttl",
        "Time-to-live for uploaded timetables [Default: 3600]",
        "SECONDS",
    );
    opts.optopt(
        "m",
        "model",
        "Gemini model used for completions [Default: gemini-pro]",
        "MODEL",
    );
    opts.optopt(
        "",
        "timeout",
        "Timeout for a single completion request [Default: 60]",
        "SECONDS",
    );
    opts.optopt(
        "s",
        "summary-source",
        "Summarize the raw file or the extracted events [Default: raw]",
        "raw|events",
    );
    opts
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))));
        process::exit(0);
    }

    match from_matches(&matches) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

fn from_matches(matches: &Matches) -> Result<Args, String> {
    let address = matches
        .opt_get_default("address", SocketAddr::from(([127, 0, 0, 1], 8080)))
        .map_err(|err| format!("Provided value for option 'address' is invalid: {err}"))?;

    let session_ttl = matches
        .opt_get_default("session-ttl", 3600)
        .map(Duration::from_secs)
        .map_err(|err| format!("Provided value for option 'session-ttl' is invalid: {err}"))?;

    let timeout = matches
        .opt_get_default("timeout", gemini::DEFAULT_TIMEOUT.as_secs())
        .map(Duration::from_secs)
        .map_err(|err| format!("Provided value for option 'timeout' is invalid: {err}"))?;

    let model = matches
        .opt_str("model")
        .unwrap_or_else(|| gemini::DEFAULT_MODEL.to_string());

    let summary_source = matches
        .opt_get_default("summary-source", SummarySource::Raw)
        .map_err(|err| format!("Provided value for option 'summary-source' is invalid: {err}"))?;

    Ok(Args {
        address,
        session_ttl,
        model,
        timeout,
        summary_source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn try_parse(args: &[&str]) -> Result<Args, String> {
        let matches = opts()
            .parse(args.iter().map(|arg| arg.to_string()))
            .map_err(|err| err.to_string())?;
        from_matches(&matches)
    }

    #[test]
    fn defaults() {
        let args = try_parse(&[]).unwrap();
        assert_eq!(args.address, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(args.session_ttl, Duration::from_secs(3600));
        assert_eq!(args.timeout, Duration::from_secs(60));
        assert_eq!(args.model, "gemini-pro");
        assert_eq!(args.summary_source, SummarySource::Raw);
    }

    #[test]
    fn overrides() {
        let args = try_parse(&[
            "-a",
            "0.0.0.0:3000",
            "--session-ttl",
            "120",
            "-m",
            "gemini-1.5-flash",
            "--timeout",
            "15",
            "-s",
            "events",
        ])
        .unwrap();

        assert_eq!(args.address, SocketAddr::from(([0, 0, 0, 0], 3000)));
        assert_eq!(args.session_ttl, Duration::from_secs(120));
        assert_eq!(args.model, "gemini-1.5-flash");
        assert_eq!(args.timeout, Duration::from_secs(15));
        assert_eq!(args.summary_source, SummarySource::Events);
    }

    #[test]
    fn invalid_values() {
        assert!(try_parse(&["-a", "localhost"]).is_err());
        assert!(try_parse(&["-t", "forever"]).is_err());
        assert!(try_parse(&["-s", "both"]).is_err());
    }
}
