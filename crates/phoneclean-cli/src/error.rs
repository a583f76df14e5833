use anyhow::Error;
use phoneclean_config::ConfigError;
use phoneclean_core::CoreError;
use phoneclean_io::IoError;
use phoneclean_store::{StoreError, StoreErrorKind};
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(CliError::InvalidInput(_)) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
        if let Some(io_err) = cause.downcast_ref::<IoError>() {
            return ExitCode::from(io_exit_code(io_err));
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return ExitCode::from(store_exit_code(store_err));
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::FileNotFound(_) => EXIT_NOT_FOUND,
        IoError::UnsupportedFileType(_)
        | IoError::EmptyFile
        | IoError::NoDataRows
        | IoError::Csv(_)
        | IoError::Zip(_)
        | IoError::Xml(_)
        | IoError::XmlEncoding(_)
        | IoError::XmlAttribute(_)
        | IoError::InvalidWorkbook(_)
        | IoError::Core(_) => EXIT_INVALID_INPUT,
        IoError::Io(_) | IoError::Read { .. } | IoError::Write { .. } => EXIT_FAILURE,
    }
}

fn store_exit_code(err: &StoreError) -> u8 {
    match err.kind() {
        StoreErrorKind::NotFound => EXIT_NOT_FOUND,
        StoreErrorKind::NotCleaned => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::MissingConfigFile(_) => EXIT_NOT_FOUND,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::InvalidSampleSize(_)
        | ConfigError::InvalidDigitRange { .. }
        | ConfigError::InvalidThreshold(_)
        | ConfigError::InvalidPreviewRows(_)
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}
