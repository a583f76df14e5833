use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub const NATIONAL_NUMBER_LEN: usize = 10;

const COUNTRY_CODE: &str = "91";
const WHATSAPP_PREFIX: &str = "+91";

// First code point of each non-ASCII run of ten decimal digits.
const DIGIT_ZEROS: [u32; 12] = [
    0x0660, // Arabic-Indic
    0x06F0, // Extended Arabic-Indic
    0x0966, // Devanagari
    0x09E6, // Bengali
    0x0A66, // Gurmukhi
    0x0AE6, // Gujarati
    0x0B66, // Oriya
    0x0BE6, // Tamil
    0x0C66, // Telugu
    0x0CE6, // Kannada
    0x0D66, // Malayalam
    0xFF10, // Fullwidth
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Only accept numbers whose first national digit is 6, 7, 8 or 9.
    pub keep_national_only: bool,
    pub include_country_code: bool,
    /// Emit `+91` prefixed numbers; wins over `include_country_code`.
    pub whatsapp_format: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            keep_national_only: true,
            include_country_code: false,
            whatsapp_format: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    National,
    CountryCode,
    Whatsapp,
}

impl FormatConfig {
    pub const fn output_format(&self) -> OutputFormat {
        if self.whatsapp_format {
            OutputFormat::Whatsapp
        } else if self.include_country_code {
            OutputFormat::CountryCode
        } else {
            OutputFormat::National
        }
    }
}

impl OutputFormat {
    fn render(self, national: &str) -> String {
        match self {
            OutputFormat::National => national.to_string(),
            OutputFormat::CountryCode => format!("{COUNTRY_CODE}{national}"),
            OutputFormat::Whatsapp => format!("{WHATSAPP_PREFIX}{national}"),
        }
    }
}

/// One prefix/length rule of the country-code reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryCodeRule {
    pub prefix: &'static str,
    /// Required total length; `None` matches any length.
    pub length: Option<usize>,
    pub strip: usize,
}

impl CountryCodeRule {
    const fn new(prefix: &'static str, length: Option<usize>, strip: usize) -> Self {
        Self {
            prefix,
            length,
            strip,
        }
    }

    pub fn matches(&self, digits: &str) -> bool {
        digits.starts_with(self.prefix) && self.length.map_or(true, |len| digits.len() == len)
    }

    pub fn apply<'a>(&self, digits: &'a str) -> &'a str {
        &digits[self.strip..]
    }
}

/// Evaluated in order, first match wins.
pub const COUNTRY_CODE_RULES: [CountryCodeRule; 7] = [
    CountryCodeRule::new("0091", None, 4),
    CountryCodeRule::new("91", Some(12), 2),
    CountryCodeRule::new("091", Some(12), 3),
    CountryCodeRule::new("0", Some(11), 1),
    CountryCodeRule::new("", Some(10), 0),
    // Unreachable: the second rule always matches first.
    CountryCodeRule::new("91", Some(12), 2),
    CountryCodeRule::new("091", Some(13), 3),
];

/// Reduces a digit-only string to its national part, or `None` when no rule applies.
pub fn strip_country_code(digits: &str) -> Option<&str> {
    COUNTRY_CODE_RULES
        .iter()
        .find(|rule| rule.matches(digits))
        .map(|rule| rule.apply(digits))
}

pub fn normalize_phone(raw: Option<&str>, config: &FormatConfig) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }

    let ascii = to_ascii_digits(trimmed);
    let expanded = expand_numeric_literal(&ascii);
    let digits: String = expanded.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    let national = strip_country_code(&digits)?;
    if national.len() != NATIONAL_NUMBER_LEN {
        return None;
    }
    if config.keep_national_only && !is_national_mobile(national) {
        return None;
    }

    Some(config.output_format().render(national))
}

pub fn normalize_column(values: &[Option<String>], config: &FormatConfig) -> Vec<Option<String>> {
    values
        .iter()
        .map(|value| normalize_phone(value.as_deref(), config))
        .collect()
}

/// Decimal value of `c` for ASCII digits and the scripts in `DIGIT_ZEROS`.
pub fn decimal_digit(c: char) -> Option<u32> {
    if let Some(value) = c.to_digit(10) {
        return Some(value);
    }
    let code = u32::from(c);
    DIGIT_ZEROS
        .iter()
        .find(|zero| (**zero..**zero + 10).contains(&code))
        .map(|zero| code - zero)
}

fn to_ascii_digits(value: &str) -> Cow<'_, str> {
    if value.is_ascii() {
        return Cow::Borrowed(value);
    }
    Cow::Owned(
        value
            .chars()
            .map(|c| match decimal_digit(c) {
                Some(digit) => char::from(b'0' + digit as u8),
                None => c,
            })
            .collect(),
    )
}

fn is_national_mobile(national: &str) -> bool {
    matches!(national.as_bytes().first(), Some(b'6'..=b'9'))
}

// Spreadsheets hand long digit runs over as floats ("9.87654321E9"); rebuild the integer.
fn expand_numeric_literal(value: &str) -> Cow<'_, str> {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Cow::Owned(format!("{:.0}", number.round_ties_even())),
        _ => Cow::Borrowed(value),
    }
}
