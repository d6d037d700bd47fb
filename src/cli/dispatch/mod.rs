use crate::cli::actions::{server, Action};
use anyhow::{anyhow, Result};

/// Translate parsed arguments into an action.
/// # Errors
/// Returns an error if a required argument is missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server(server::Args {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        auth_api_url: required_string(matches, "auth-api-url")?,
        public_base_url: required_string(matches, "public-base-url")?,
        allowed_app_origins: required_string(matches, "allowed-app-origins")?,
        access_ttl_seconds: matches
            .get_one::<i64>("access-ttl-seconds")
            .copied()
            .unwrap_or(3600),
        refresh_ttl_seconds: matches
            .get_one::<i64>("refresh-ttl-seconds")
            .copied()
            .unwrap_or(604_800),
        csrf_ttl_seconds: matches
            .get_one::<i64>("csrf-ttl-seconds")
            .copied()
            .unwrap_or(86_400),
        upstream_timeout_seconds: matches
            .get_one::<u64>("upstream-timeout-seconds")
            .copied()
            .unwrap_or(10),
    }))
}

fn required_string(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .map(ToString::to_string)
        .ok_or_else(|| anyhow!("missing required argument: --{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn handler_builds_server_action() {
        let matches = commands::new().get_matches_from(vec![
            "pordego",
            "--port",
            "9090",
            "--auth-api-url",
            "https://api.example.com",
            "--public-base-url",
            "https://auth.example.com",
            "--allowed-app-origins",
            "https://products.example.com",
            "--upstream-timeout-seconds",
            "5",
        ]);

        let Action::Server(args) = handler(&matches).unwrap();
        assert_eq!(args.port, 9090);
        assert_eq!(args.auth_api_url, "https://api.example.com");
        assert_eq!(args.public_base_url, "https://auth.example.com");
        assert_eq!(args.allowed_app_origins, "https://products.example.com");
        assert_eq!(args.access_ttl_seconds, 3600);
        assert_eq!(args.refresh_ttl_seconds, 604_800);
        assert_eq!(args.csrf_ttl_seconds, 86_400);
        assert_eq!(args.upstream_timeout_seconds, 5);
    }
}
