pub mod session;

use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("pordego")
        .about("SSO front door and session gateway")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("PORDEGO_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("auth-api-url")
                .long("auth-api-url")
                .help("Base URL of the upstream authentication backend")
                .env("PORDEGO_AUTH_API_URL")
                .required(true),
        )
        .arg(
            Arg::new("public-base-url")
                .long("public-base-url")
                .help("Public base URL this application is served from")
                .env("PORDEGO_PUBLIC_BASE_URL")
                .required(true),
        )
        .arg(
            Arg::new("allowed-app-origins")
                .long("allowed-app-origins")
                .help("Comma-separated downstream product origins allowed as redirect targets")
                .env("PORDEGO_ALLOWED_APP_ORIGINS")
                .required(true),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("PORDEGO_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        );

    session::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required_args() -> Vec<&'static str> {
        vec![
            "pordego",
            "--auth-api-url",
            "https://api.example.com",
            "--public-base-url",
            "https://auth.example.com",
            "--allowed-app-origins",
            "https://products.example.com",
        ]
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "pordego");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "SSO front door and session gateway"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_check_required_urls() {
        let command = new();
        let matches = command.get_matches_from(required_args());

        assert_eq!(matches.get_one::<u16>("port").copied(), Some(8080));
        assert_eq!(
            matches
                .get_one::<String>("auth-api-url")
                .map(ToString::to_string),
            Some("https://api.example.com".to_string())
        );
        assert_eq!(
            matches
                .get_one::<String>("public-base-url")
                .map(ToString::to_string),
            Some("https://auth.example.com".to_string())
        );
        assert_eq!(
            matches
                .get_one::<String>("allowed-app-origins")
                .map(ToString::to_string),
            Some("https://products.example.com".to_string())
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("PORDEGO_AUTH_API_URL", Some("https://api.example.com")),
                ("PORDEGO_PUBLIC_BASE_URL", Some("https://auth.example.com")),
                (
                    "PORDEGO_ALLOWED_APP_ORIGINS",
                    Some("https://products.example.com,https://other.example.com"),
                ),
                ("PORDEGO_PORT", Some("443")),
                ("PORDEGO_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["pordego"]);
                assert_eq!(matches.get_one::<u16>("port").copied(), Some(443));
                assert_eq!(
                    matches
                        .get_one::<String>("allowed-app-origins")
                        .map(ToString::to_string),
                    Some("https://products.example.com,https://other.example.com".to_string())
                );
                assert_eq!(matches.get_one::<u8>("verbosity").copied(), Some(2));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("PORDEGO_LOG_LEVEL", Some(level)),
                    ("PORDEGO_AUTH_API_URL", Some("https://api.example.com")),
                    ("PORDEGO_PUBLIC_BASE_URL", Some("https://auth.example.com")),
                    (
                        "PORDEGO_ALLOWED_APP_ORIGINS",
                        Some("https://products.example.com"),
                    ),
                ],
                || {
                    let command = new();
                    let matches = command.get_matches_from(vec!["pordego"]);
                    assert_eq!(
                        matches.get_one::<u8>("verbosity").copied(),
                        Some(u8::try_from(index).unwrap_or_default())
                    );
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("PORDEGO_LOG_LEVEL", None::<String>)], || {
                let mut args: Vec<String> =
                    required_args().iter().map(ToString::to_string).collect();

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                let command = new();
                let matches = command.get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    Some(u8::try_from(index).unwrap_or_default())
                );
            });
        }
    }
}
