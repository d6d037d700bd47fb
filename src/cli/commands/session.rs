use clap::{Arg, Command};

/// Session cookie and upstream timing arguments.
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("access-ttl-seconds")
                .long("access-ttl-seconds")
                .help("Fallback access cookie TTL when the token carries no exp claim")
                .env("PORDEGO_ACCESS_TTL_SECONDS")
                .default_value("3600")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("refresh-ttl-seconds")
                .long("refresh-ttl-seconds")
                .help("Refresh cookie TTL")
                .env("PORDEGO_REFRESH_TTL_SECONDS")
                .default_value("604800")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("csrf-ttl-seconds")
                .long("csrf-ttl-seconds")
                .help("CSRF cookie TTL")
                .env("PORDEGO_CSRF_TTL_SECONDS")
                .default_value("86400")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("upstream-timeout-seconds")
                .long("upstream-timeout-seconds")
                .help("Timeout for calls to the auth backend")
                .env("PORDEGO_UPSTREAM_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_args_have_defaults() {
        let command = with_args(Command::new("test"));
        let matches = command.get_matches_from(vec!["test"]);

        assert_eq!(
            matches.get_one::<i64>("access-ttl-seconds").copied(),
            Some(3600)
        );
        assert_eq!(
            matches.get_one::<i64>("refresh-ttl-seconds").copied(),
            Some(604_800)
        );
        assert_eq!(
            matches.get_one::<i64>("csrf-ttl-seconds").copied(),
            Some(86_400)
        );
        assert_eq!(
            matches.get_one::<u64>("upstream-timeout-seconds").copied(),
            Some(10)
        );
    }
}
