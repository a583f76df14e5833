pub mod phone;

pub use phone::{
    decimal_digit, normalize_column, normalize_phone, strip_country_code, CountryCodeRule,
    FormatConfig, OutputFormat, COUNTRY_CODE_RULES, NATIONAL_NUMBER_LEN,
};
