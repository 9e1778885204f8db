//! Tests for loading shapes and generating values from command-line arguments

use clap::Parser;
use fill_fixtures::{generate, GenerateArgs, Value};
use std::io::Write;
use tempfile::NamedTempFile;

const USER_SHAPE: &str = r#"
type: record
name: User
fields:
  - name: id
    type: u64
  - name: email
    type: string
  - name: manager
    type:
      type: optional
      element: u64
  - name: password_hash
    type: string
    settable: false
"#;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    file.flush().unwrap();
    file
}

fn parse(args: &[&str]) -> GenerateArgs {
    let mut argv = vec!["fill-fixtures"];
    argv.extend_from_slice(args);
    GenerateArgs::try_parse_from(argv).unwrap()
}

#[test]
fn test_zero_values_from_shape_file() {
    let shape = write_temp(USER_SHAPE);
    let args = parse(&["--shape", shape.path().to_str().unwrap(), "--zero", "--count", "2"]);

    let values = generate(&args).unwrap();
    assert_eq!(values.len(), 2);
    for user in &values {
        assert_eq!(user.field("id"), Some(&Value::Uint64(0)));
        assert_eq!(user.field("email").and_then(Value::as_str), Some(""));
        assert_eq!(
            user.field("manager").and_then(Value::pointee),
            Some(&Value::Uint64(0))
        );
    }
}

#[test]
fn test_seeded_output_is_reproducible() {
    let shape = write_temp(USER_SHAPE);
    let path = shape.path().to_str().unwrap();
    let args = parse(&["--shape", path, "--seed", "42", "--count", "5"]);

    let first = generate(&args).unwrap();
    let second = generate(&args).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 5);
}

#[test]
fn test_unsettable_fields_keep_zero_value() {
    let shape = write_temp(USER_SHAPE);
    let args = parse(&[
        "--shape",
        shape.path().to_str().unwrap(),
        "--seed",
        "1",
        "--min-size",
        "3",
        "--max-size",
        "6",
        "--count",
        "10",
    ]);

    for user in generate(&args).unwrap() {
        assert_eq!(user.field("password_hash").and_then(Value::as_str), Some(""));
        let email = user.field("email").and_then(Value::as_str).unwrap();
        assert!((3..6).contains(&email.len()));
    }
}

#[test]
fn test_flags_override_config_file() {
    let config = write_temp("min_size: 1\nmax_size: 8\nalphabet: base64\nseed: 9\n");
    let args = parse(&[
        "--shape",
        "unused.yaml",
        "--config",
        config.path().to_str().unwrap(),
        "--max-size",
        "4",
        "--never-absent",
        "--alphabet",
        "bytes",
    ]);

    let config = args.fill_config().unwrap();
    assert_eq!(config.min_size, 1);
    assert_eq!(config.max_size, 4);
    assert!(config.never_absent);
    assert_eq!(config.alphabet, fill_fixtures::engine::Alphabet::Bytes);
    assert_eq!(config.seed, Some(9));
}

#[test]
fn test_never_absent_flag() {
    let shape = write_temp(
        "type: seq\nelement:\n  type: map\n  key: string\n  value: bool\n",
    );
    let args = parse(&[
        "--shape",
        shape.path().to_str().unwrap(),
        "--seed",
        "3",
        "--never-absent",
        "--count",
        "50",
    ]);

    for seq in generate(&args).unwrap() {
        assert!(!seq.is_absent());
        let Value::Seq {
            items: Some(items), ..
        } = &seq
        else {
            panic!("Expected present seq, got {seq}");
        };
        assert!(items.iter().all(|map| !map.is_absent()));
    }
}

#[test]
fn test_invalid_bounds_reported() {
    let shape = write_temp(USER_SHAPE);
    let args = parse(&[
        "--shape",
        shape.path().to_str().unwrap(),
        "--min-size",
        "5",
        "--max-size",
        "2",
    ]);

    let err = generate(&args).unwrap_err();
    assert!(format!("{err:#}").contains("invalid argument"));
}

#[test]
fn test_unsupported_shape_reported() {
    let shape = write_temp(
        "type: record\nname: Conn\nfields:\n  - name: socket\n    type:\n      type: foreign\n      name: Socket\n",
    );
    let args = parse(&["--shape", shape.path().to_str().unwrap(), "--zero"]);

    let err = generate(&args).unwrap_err();
    assert!(format!("{err:#}").contains("unsupported type"));
}

#[test]
fn test_missing_shape_file_reported() {
    let args = parse(&["--shape", "/nonexistent/shape.yaml"]);
    let err = generate(&args).unwrap_err();
    assert!(err.to_string().contains("Failed to load shape"));
}

#[test]
fn test_unknown_alphabet_rejected() {
    let result = GenerateArgs::try_parse_from([
        "fill-fixtures",
        "--shape",
        "user.yaml",
        "--alphabet",
        "morse",
    ]);
    assert!(result.is_err());
}
