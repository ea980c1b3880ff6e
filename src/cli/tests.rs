use super::*;
use std::path::Path;

mod test_helpers {
    use super::*;

    pub(super) fn parse_args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv)
            .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
    }

    pub(super) fn assert_optional_flag_value(
        actual: Option<&str>,
        expected: Option<&str>,
        flag_name: &str,
        argv: &[&str],
    ) {
        assert_eq!(
            actual, expected,
            "unexpected value for {flag_name} when parsing argv={argv:?}"
        );
    }
}

use test_helpers::{assert_optional_flag_value, parse_args};

#[test]
fn no_subcommand_defaults_to_interactive() {
    let args = parse_args(&["headstart"]);
    assert!(args.command.is_none());
    assert!(args.endpoint.is_none());
    assert!(args.timeout_secs.is_none());
}

#[test]
fn endpoint_flag_parsing() {
    let cases: [(&[&str], Option<&str>); 4] = [
        (
            &["headstart", "-e", "http://example.com/api/chat"],
            Some("http://example.com/api/chat"),
        ),
        (
            &["headstart", "--endpoint", "https://chat.example.org/"],
            Some("https://chat.example.org/"),
        ),
        (
            &["headstart", "say", "--endpoint", "http://x/api", "hello"],
            Some("http://x/api"),
        ),
        (&["headstart", "chat"], None),
    ];

    for (argv, expected) in cases {
        let args = parse_args(argv);
        assert_optional_flag_value(args.endpoint.as_deref(), expected, "endpoint", argv);
    }
}

#[test]
fn timeout_flag_is_global() {
    let args = parse_args(&["headstart", "chat", "-t", "0"]);
    assert_eq!(args.timeout_secs, Some(0));

    let args = parse_args(&["headstart", "--timeout-secs", "15"]);
    assert_eq!(args.timeout_secs, Some(15));

    assert!(Args::try_parse_from(["headstart", "-t", "soon"]).is_err());
}

#[test]
fn log_and_transcript_paths() {
    let args = parse_args(&[
        "headstart",
        "--log",
        "debug.log",
        "--transcript",
        "chat.txt",
    ]);
    assert_eq!(args.log.as_deref(), Some(Path::new("debug.log")));
    assert_eq!(args.transcript.as_deref(), Some(Path::new("chat.txt")));
}

#[test]
fn say_collects_prompt_words() {
    let args = parse_args(&["headstart", "say", "I", "need", "a", "plumber"]);
    match args.command {
        Some(Commands::Say { prompt }) => {
            assert_eq!(prompt.join(" "), "I need a plumber");
        }
        _ => panic!("expected say subcommand"),
    }
}

#[test]
fn say_requires_a_prompt() {
    assert!(Args::try_parse_from(["headstart", "say"]).is_err());
}

#[test]
fn set_accepts_multi_word_values() {
    let args = parse_args(&["headstart", "set", "greeting", "Hello", "there!"]);
    match args.command {
        Some(Commands::Set { key, value }) => {
            assert_eq!(key, "greeting");
            assert_eq!(
                value,
                Some(vec!["Hello".to_string(), "there!".to_string()])
            );
        }
        _ => panic!("expected set subcommand"),
    }
}

#[test]
fn set_without_value_parses() {
    let args = parse_args(&["headstart", "set", "endpoint"]);
    match args.command {
        Some(Commands::Set { key, value }) => {
            assert_eq!(key, "endpoint");
            assert!(value.is_none());
        }
        _ => panic!("expected set subcommand"),
    }
}

#[test]
fn unset_takes_a_key() {
    let args = parse_args(&["headstart", "unset", "timeout-secs"]);
    match args.command {
        Some(Commands::Unset { key }) => assert_eq!(key, "timeout-secs"),
        _ => panic!("expected unset subcommand"),
    }
}

#[test]
fn overrides_carry_flag_values() {
    let args = parse_args(&["headstart", "-e", "http://localhost:8080/chat", "-t", "3"]);
    let overrides = args.overrides();
    assert_eq!(
        overrides.endpoint.as_deref(),
        Some("http://localhost:8080/chat")
    );
    assert_eq!(overrides.timeout_secs, Some(3));
}
