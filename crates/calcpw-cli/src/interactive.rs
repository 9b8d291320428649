//! Interactive mode: query the master password once, then derive
//! passwords for any number of information strings.
//!
//! The master password is read twice with echo suppressed and compared in
//! constant time. All inputs follow the reference policy: ASCII only,
//! never empty. Configuration values (length, character set, enforcement)
//! are queried per derivation with their defaults shown; a configuration
//! error aborts the current round and returns to the information prompt.
//! End-of-input exits cleanly.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use calcpw_core::{calculate, Charset, Config, DEFAULT_CHARSET, DEFAULT_ITERATIONS, DEFAULT_LENGTH};

/// Run the interactive loop until end-of-input.
pub fn run() -> ExitCode {
    match interact() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Terminal went away (closed stdin mid-read, tty error).
            tracing::debug!(%err, "interactive session ended");
            ExitCode::SUCCESS
        }
    }
}

fn interact() -> io::Result<()> {
    let Some(secret) = read_secret()? else {
        return Ok(());
    };
    println!();

    loop {
        let Some(info) = read_info()? else {
            return Ok(());
        };

        let config = match read_config()? {
            ConfigEntry::Eof => return Ok(()),
            // Configuration error already reported; start the round over.
            ConfigEntry::Invalid => continue,
            ConfigEntry::Valid(config) => config,
        };

        match calculate(secret.as_bytes(), info.as_bytes(), &config) {
            Ok(password) => {
                println!();
                println!("{password}");
                println!();
            }
            Err(err) => {
                report(&err.to_string());
            }
        }
    }
}

/// Read the master password twice with echo suppressed.
///
/// Returns `None` on end-of-input. Re-prompts until both entries are
/// non-empty, ASCII, and identical (compared in constant time).
fn read_secret() -> io::Result<Option<Zeroizing<String>>> {
    loop {
        let Some(first) = read_password_line()? else {
            return Ok(None);
        };

        if !first.is_ascii() {
            report("password contains illegal characters");
            continue;
        }
        if first.is_empty() {
            report("password must not be empty");
            continue;
        }

        let Some(second) = read_password_line()? else {
            return Ok(None);
        };

        if first.as_bytes().ct_eq(second.as_bytes()).into() {
            return Ok(Some(first));
        }
        report("passwords do not match");
    }
}

/// One echo-suppressed password entry.
fn read_password_line() -> io::Result<Option<Zeroizing<String>>> {
    match rpassword::prompt_password("Password: ") {
        Ok(entry) => Ok(Some(Zeroizing::new(entry))),
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(err) => Err(err),
    }
}

/// Read the information string: ASCII, non-empty.
fn read_info() -> io::Result<Option<String>> {
    loop {
        let Some(info) = read_line("Information", "")? else {
            return Ok(None);
        };

        if !info.is_ascii() {
            report("information contains illegal characters");
            continue;
        }
        if info.is_empty() {
            report("information must not be empty");
            continue;
        }
        return Ok(Some(info));
    }
}

/// Outcome of one round of configuration prompts.
enum ConfigEntry {
    /// End-of-input while prompting.
    Eof,
    /// A configuration error was reported; the round should restart.
    Invalid,
    /// A validated configuration.
    Valid(Config),
}

/// Query length, character set, and enforcement for one derivation.
fn read_config() -> io::Result<ConfigEntry> {
    let Some(length_entry) = read_line("Length", &DEFAULT_LENGTH.to_string())? else {
        return Ok(ConfigEntry::Eof);
    };
    let Ok(length) = length_entry.parse::<usize>() else {
        report("length must be a positive number");
        return Ok(ConfigEntry::Invalid);
    };

    let Some(charset_entry) = read_line("Characterset", DEFAULT_CHARSET)? else {
        return Ok(ConfigEntry::Eof);
    };
    let charset = match Charset::parse(&charset_entry) {
        Ok(charset) => charset,
        Err(err) => {
            report(&err.to_string());
            return Ok(ConfigEntry::Invalid);
        }
    };

    let Some(enforce_entry) = read_line("Enforce", "false")? else {
        return Ok(ConfigEntry::Eof);
    };
    let enforce = parse_bool(&enforce_entry);

    match Config::new(length, charset, enforce, DEFAULT_ITERATIONS) {
        Ok(config) => Ok(ConfigEntry::Valid(config)),
        Err(err) => {
            report(&err.to_string());
            Ok(ConfigEntry::Invalid)
        }
    }
}

/// Prompt with a visible default; empty input selects the default.
///
/// Returns `None` on end-of-input.
fn read_line(label: &str, default: &str) -> io::Result<Option<String>> {
    if default.is_empty() {
        print!("{label}: ");
    } else {
        print!("{label} [{default}]: ");
    }
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        println!();
        return Ok(None);
    }

    let entry = line.trim();
    if entry.is_empty() {
        Ok(Some(default.to_string()))
    } else {
        Ok(Some(entry.to_string()))
    }
}

/// Boolean parsing matching the reference: `1`, `true`, `yes`, `on`
/// (case insensitive) are true, everything else is false.
fn parse_bool(entry: &str) -> bool {
    matches!(
        entry.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Print a recoverable error the way the reference does, framed by blank
/// lines so it stands out between prompts.
fn report(message: &str) {
    println!();
    println!("ERROR: {message}");
    println!();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values_parse_true() {
        for entry in ["1", "true", "TRUE", "yes", "Yes", "on", " on "] {
            assert!(parse_bool(entry), "{entry} should be true");
        }
    }

    #[test]
    fn everything_else_parses_false() {
        for entry in ["", "0", "false", "no", "off", "enforce", "2"] {
            assert!(!parse_bool(entry), "{entry} should be false");
        }
    }
}
