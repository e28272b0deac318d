mod common;
use common::*;

use sitop_bridge::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn applies_capture_format_defaults() -> Result<()> {
    common_setup();

    let mut file = NamedTempFile::new()?;
    writeln!(file, "dump:")?;
    writeln!(file, "  file: capture.txt")?;

    let config = Config::new(file.path().display().to_string())?;

    assert_eq!(config.dump().file(), "capture.txt");
    assert_eq!(config.dump().hex_offset(), 4);
    assert_eq!(config.dump().incoming_prefix(), "> ");
    assert_eq!(config.loglevel(), "info");

    Ok(())
}

#[test]
fn reads_explicit_capture_format() -> Result<()> {
    common_setup();

    let mut file = NamedTempFile::new()?;
    writeln!(file, "loglevel: debug")?;
    writeln!(file, "dump:")?;
    writeln!(file, "  file: /var/log/inverter/capture.txt")?;
    writeln!(file, "  hex_offset: 2")?;
    writeln!(file, "  incoming_prefix: \"R \"")?;

    let config = Config::new(file.path().display().to_string())?;

    assert_eq!(config.dump().file(), "/var/log/inverter/capture.txt");
    assert_eq!(config.dump().hex_offset(), 2);
    assert_eq!(config.dump().incoming_prefix(), "R ");
    assert_eq!(config.loglevel(), "debug");

    Ok(())
}

#[test]
fn fails_on_missing_file() {
    common_setup();

    assert!(Config::new("/nonexistent/config.yaml".to_string()).is_err());
}

#[test]
fn fails_without_dump_section() -> Result<()> {
    common_setup();

    let mut file = NamedTempFile::new()?;
    writeln!(file, "loglevel: info")?;

    assert!(Config::new(file.path().display().to_string()).is_err());

    Ok(())
}
