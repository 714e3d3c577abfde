//! Supported Adzuna markets
//!
//! Adzuna serves a fixed set of country sites. The country code selects both the
//! job market and the currency every salary figure is reported in.

use crate::error::{sanitize_error_message, AdzunaError};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Country code accepted by every market-scoped endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    Gb,
    Us,
    De,
    Fr,
    Au,
    Nz,
    Ca,
    In,
    Pl,
    Br,
    At,
    Za,
}

impl Country {
    /// All supported markets, in the order Adzuna documents them
    pub const ALL: [Country; 12] = [
        Country::Gb,
        Country::Us,
        Country::De,
        Country::Fr,
        Country::Au,
        Country::Nz,
        Country::Ca,
        Country::In,
        Country::Pl,
        Country::Br,
        Country::At,
        Country::Za,
    ];

    /// ISO 3166-1 alpha-2 code as used in Adzuna URL paths
    pub fn code(&self) -> &'static str {
        match self {
            Country::Gb => "gb",
            Country::Us => "us",
            Country::De => "de",
            Country::Fr => "fr",
            Country::Au => "au",
            Country::Nz => "nz",
            Country::Ca => "ca",
            Country::In => "in",
            Country::Pl => "pl",
            Country::Br => "br",
            Country::At => "at",
            Country::Za => "za",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Country::Gb => "United Kingdom",
            Country::Us => "United States",
            Country::De => "Germany",
            Country::Fr => "France",
            Country::Au => "Australia",
            Country::Nz => "New Zealand",
            Country::Ca => "Canada",
            Country::In => "India",
            Country::Pl => "Poland",
            Country::Br => "Brazil",
            Country::At => "Austria",
            Country::Za => "South Africa",
        }
    }

    /// ISO 4217 currency code
    pub fn currency(&self) -> &'static str {
        match self {
            Country::Gb => "GBP",
            Country::Us => "USD",
            Country::De | Country::Fr | Country::At => "EUR",
            Country::Au => "AUD",
            Country::Nz => "NZD",
            Country::Ca => "CAD",
            Country::In => "INR",
            Country::Pl => "PLN",
            Country::Br => "BRL",
            Country::Za => "ZAR",
        }
    }

    pub fn currency_symbol(&self) -> &'static str {
        match self {
            Country::Gb => "£",
            Country::Us | Country::Au | Country::Nz | Country::Ca => "$",
            Country::De | Country::Fr | Country::At => "€",
            Country::In => "₹",
            Country::Pl => "zł",
            Country::Br => "R$",
            Country::Za => "R",
        }
    }

    /// Look up a country code, ignoring case and surrounding whitespace
    pub fn parse(code: &str) -> Result<Self, AdzunaError> {
        let normalized = code.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|country| country.code() == normalized)
            .ok_or_else(|| AdzunaError::UnsupportedCountry {
                code: echo_code(code),
                supported: Self::supported_codes(),
            })
    }

    /// Comma-separated list of valid codes for error messages and tool docs
    pub fn supported_codes() -> String {
        Self::ALL
            .iter()
            .map(|c| c.code())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Annotation block attached to every market-scoped tool response
    pub fn context(&self) -> CountryContext {
        CountryContext {
            code: self.code(),
            name: self.name(),
            currency: self.currency(),
            currency_symbol: self.currency_symbol(),
        }
    }
}

/// Market and currency a response's salary figures refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountryContext {
    pub code: &'static str,
    pub name: &'static str,
    pub currency: &'static str,
    pub currency_symbol: &'static str,
}

const MAX_ECHOED_CODE_CHARS: usize = 16;

/// Caller input quoted back in an error, bounded and scrubbed
fn echo_code(code: &str) -> String {
    let mut echoed: String = code.chars().take(MAX_ECHOED_CODE_CHARS).collect();
    if code.chars().count() > MAX_ECHOED_CODE_CHARS {
        echoed.push_str("...");
    }
    sanitize_error_message(&echoed)
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Country {
    type Err = AdzunaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
