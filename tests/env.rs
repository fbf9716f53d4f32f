use earnings_digest::service::env::{get_bool_env, get_int_env, require_env};

// Each test uses its own variable name; integration tests may run on
// parallel threads and the process environment is shared.

#[test]
fn int_env_returns_default_for_blank() {
    std::env::set_var("TEST_PORT_BLANK", "");
    assert_eq!(get_int_env("TEST_PORT_BLANK", 1234).expect("should fall back"), 1234);
}

#[test]
fn int_env_returns_default_when_unset() {
    std::env::remove_var("TEST_PORT_UNSET");
    assert_eq!(get_int_env("TEST_PORT_UNSET", 1234).expect("should fall back"), 1234);
}

#[test]
fn int_env_parses_a_set_value() {
    std::env::set_var("TEST_PORT_SET", "2525");
    assert_eq!(get_int_env("TEST_PORT_SET", 1234).expect("should parse"), 2525);
}

#[test]
fn int_env_error_names_the_variable() {
    std::env::set_var("TEST_PORT_BAD", "abc");
    let err = get_int_env("TEST_PORT_BAD", 1234).expect_err("abc is not an integer");
    assert!(err.to_string().contains("TEST_PORT_BAD"), "got: {err}");
}

#[test]
fn bool_env_falsy_tokens_disable() {
    for (value, expected) in [
        ("0", false),
        ("false", false),
        ("No", false),
        ("OFF", false),
        ("1", true),
        ("yes", true),
        ("anything", true),
    ] {
        std::env::set_var("TEST_FLAG_TOKENS", value);
        assert_eq!(get_bool_env("TEST_FLAG_TOKENS", true), expected, "value: {value}");
    }
}

#[test]
fn bool_env_unset_uses_default() {
    std::env::remove_var("TEST_FLAG_UNSET");
    assert!(get_bool_env("TEST_FLAG_UNSET", true));
    assert!(!get_bool_env("TEST_FLAG_UNSET", false));
}

#[test]
fn require_env_rejects_blank_values() {
    std::env::set_var("TEST_REQUIRED_BLANK", "   ");
    let err = require_env("TEST_REQUIRED_BLANK").expect_err("blank should not satisfy");
    assert!(err.to_string().contains("TEST_REQUIRED_BLANK"));
}
