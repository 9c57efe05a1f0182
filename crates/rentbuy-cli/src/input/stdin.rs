use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise a piped JSON document, e.g. an `evaluate` listing or an
/// `amortize` loan, when no `--input` file was given.
///
/// Returns None when stdin is a terminal or the pipe is empty, so the
/// command falls back to its flags.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(buffer: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let document = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse piped JSON: {}", e))?;
    Ok(Some(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentbuy_core::mortgage::amortization::AmortizationInput;

    #[test]
    fn test_blank_pipe_falls_back_to_flags() {
        let parsed: Option<AmortizationInput> = parse_piped("  \n").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_piped_loan() {
        let parsed: Option<AmortizationInput> =
            parse_piped(r#"{"principal": "500000", "annual_rate_percent": "9", "tenure_years": 10}"#)
                .unwrap();
        assert_eq!(parsed.unwrap().tenure_years, 10);
    }

    #[test]
    fn test_bad_pipe_is_an_error() {
        let err = parse_piped::<AmortizationInput>("{not json").unwrap_err();
        assert!(err.to_string().contains("piped JSON"));
    }
}
