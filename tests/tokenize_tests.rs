use logsieve::config::Config;
use logsieve::tokenize::Tokenizer;

fn tokenizer(config: &Config) -> Tokenizer {
    Tokenizer::from_config(config).unwrap()
}

#[test]
fn splits_on_whitespace_by_default() {
    let tok = tokenizer(&Config::default());
    assert_eq!(
        tok.split("user  login\tok"),
        vec!["user".to_string(), "login".to_string(), "ok".to_string()]
    );
}

#[test]
fn leading_separators_do_not_produce_empty_tokens() {
    let tok = tokenizer(&Config::default());
    assert_eq!(tok.split("  padded line "), vec!["padded", "line"]);
    assert!(tok.split("   ").is_empty());
}

#[test]
fn custom_separator_regex_applies() {
    let config = Config {
        separator: Some(",".to_string()),
        ..Config::default()
    };
    let tok = tokenizer(&config);
    assert_eq!(tok.split("a,b,,c"), vec!["a", "b", "c"]);
}

#[test]
fn byte_offset_skips_line_prefix() {
    let config = Config {
        byte_offset: 4,
        ..Config::default()
    };
    let tok = tokenizer(&config);
    assert_eq!(tok.split("123 user login"), vec!["user", "login"]);
    assert!(tok.split("123").is_empty());
}

#[test]
fn line_filter_rejects_unmatched_lines() {
    let config = Config {
        line_filter: Some(r"sshd\[\d+\]:".to_string()),
        ..Config::default()
    };
    let tok = tokenizer(&config);
    assert!(tok.split("cron[1]: job done").is_empty());
    assert_eq!(
        tok.split("sshd[123]: accepted"),
        vec!["sshd[123]:", "accepted"]
    );
}

#[test]
fn template_rewrites_matched_lines_from_captures() {
    let config = Config {
        line_filter: Some(r"^\S+ \S+ (sshd\[\d+\]: .*)$".to_string()),
        template: Some("$1".to_string()),
        ..Config::default()
    };
    let tok = tokenizer(&config);
    assert_eq!(
        tok.split("Apr15 myhost sshd[123]: this is a test"),
        vec!["sshd[123]:", "this", "is", "a", "test"]
    );
}

#[test]
fn invalid_separator_regex_is_rejected() {
    let config = Config {
        separator: Some("[".to_string()),
        ..Config::default()
    };
    assert!(Tokenizer::from_config(&config).is_err());
}
