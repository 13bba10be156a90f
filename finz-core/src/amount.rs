//! Amount extraction from Brazilian-Portuguese free text.
//!
//! Handles the `1.234,56` / `1,234.56` / `12,50` / `40` shapes and the
//! thousands-vs-decimal ambiguity between `.` and `,`.

use anyhow::Result;
use regex::Regex;

/// Extracts a single positive amount from free text.
///
/// Patterns are tried in a fixed order so the full Brazilian format wins
/// over a separated number, which wins over a bare integer. Extraction is
/// pure: same input, same output.
#[derive(Debug)]
pub struct AmountExtractor {
    currency_marker: Regex,
    whitespace: Regex,
    patterns: Vec<Regex>,
}

impl AmountExtractor {
    /// Compile the fixed pattern set. The only fallible step; extraction
    /// itself never fails.
    pub fn new() -> Result<Self> {
        Ok(Self {
            currency_marker: Regex::new(r"r\$\s*")?,
            whitespace: Regex::new(r"\s+")?,
            patterns: vec![
                // 1. full format: thousands groups plus 2 decimal digits
                Regex::new(r"\d{1,3}(?:[.,]\d{3})+[.,]\d{2}")?,
                // 2. any separated number; decimal vs thousands is decided
                //    during normalization
                Regex::new(r"\d+(?:[.,]\d+)+")?,
                // 3. bare integer
                Regex::new(r"\d+")?,
            ],
        })
    }

    /// Extract the first amount in `text`, or `None` when nothing parses
    /// to a finite value > 0.
    pub fn extract(&self, text: &str) -> Option<f64> {
        let lower = text.to_lowercase();
        let stripped = self.currency_marker.replace_all(&lower, "");
        let normalized = self.whitespace.replace_all(&stripped, " ");
        let normalized = normalized.trim();

        for re in &self.patterns {
            for m in re.find_iter(normalized) {
                if is_negative_or_mid_token(&normalized[..m.start()]) {
                    continue;
                }
                if let Some(value) = parse_brazilian_number(m.as_str()) {
                    return Some(value);
                }
            }
        }
        None
    }
}

/// A leading minus reads as a correction/adjustment, not an amount to
/// record. A separator directly after a digit means the match starts
/// mid-way through a numeric token an earlier pattern already skipped.
fn is_negative_or_mid_token(prefix: &str) -> bool {
    let mut chars = prefix.chars().rev();
    match chars.next() {
        Some('-') => true,
        Some('.') | Some(',') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Resolve separators in a matched numeric token and parse it.
///
/// Rules:
/// - both `.` and `,` present: the last-occurring separator is the decimal
///   point, every occurrence of the other one is a thousands marker;
/// - a single separator kind: one occurrence followed by 1-2 digits is a
///   decimal point (`12,5`, `12,34`), anything else is thousands grouping
///   (`1,234`, `1.234.567`).
fn parse_brazilian_number(token: &str) -> Option<f64> {
    let has_dot = token.contains('.');
    let has_comma = token.contains(',');

    let cleaned = if has_dot && has_comma {
        let (decimal, thousands) = if token.rfind('.') > token.rfind(',') {
            ('.', ',')
        } else {
            (',', '.')
        };
        token
            .replace(thousands, "")
            .replace(decimal, ".")
    } else if has_dot || has_comma {
        let sep = if has_dot { '.' } else { ',' };
        let occurrences = token.matches(sep).count();
        let trailing = token.len() - token.rfind(sep)? - 1;
        if occurrences == 1 && (1..=2).contains(&trailing) {
            token.replace(sep, ".")
        } else {
            token.replace(sep, "")
        }
    } else {
        token.to_string()
    };

    let value: f64 = cleaned.parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<f64> {
        AmountExtractor::new().unwrap().extract(text)
    }

    #[test]
    fn test_full_brazilian_format() {
        assert_eq!(extract("paguei 1.234,56 de aluguel"), Some(1234.56));
        assert_eq!(extract("recebi 1,234.56 hoje"), Some(1234.56));
    }

    #[test]
    fn test_simple_decimal() {
        assert_eq!(extract("gastei 45,90 em comida"), Some(45.9));
        assert_eq!(extract("12,50 no lanche"), Some(12.5));
        assert_eq!(extract("abasteci por 12.5"), Some(12.5));
    }

    #[test]
    fn test_separator_disambiguation() {
        // lone comma with a 3-digit group is thousands, not a decimal
        assert_eq!(extract("transferi 1,234"), Some(1234.0));
        assert_eq!(extract("paguei 12,34"), Some(12.34));
        assert_eq!(extract("ganhei 1.000"), Some(1000.0));
        assert_eq!(extract("venda de 1.234.567"), Some(1234567.0));
    }

    #[test]
    fn test_bare_integer() {
        assert_eq!(extract("gastei 40 no mercado"), Some(40.0));
    }

    #[test]
    fn test_currency_marker_stripped() {
        assert_eq!(extract("paguei R$ 50 no mercado"), Some(50.0));
        assert_eq!(extract("R$40 de uber"), Some(40.0));
    }

    #[test]
    fn test_formatted_number_wins_over_earlier_integer() {
        // pattern precedence: the fully formatted amount beats the bare
        // integer that appears first
        assert_eq!(extract("12 parcelas de 1.234,56"), Some(1234.56));
    }

    #[test]
    fn test_no_amount() {
        assert_eq!(extract("gastei no mercado"), None);
        assert_eq!(extract(""), None);
        assert_eq!(extract("   "), None);
    }

    #[test]
    fn test_rejects_zero_and_negative() {
        assert_eq!(extract("gastei 0 no mercado"), None);
        assert_eq!(extract("ajuste de -50"), None);
        // no digit fragment of a negative amount leaks through either
        assert_eq!(extract("saldo -1.234,56"), None);
    }

    #[test]
    fn test_deterministic() {
        let ex = AmountExtractor::new().unwrap();
        let a = ex.extract("gastei 45,90 em comida");
        let b = ex.extract("gastei 45,90 em comida");
        assert_eq!(a, b);
    }
}
