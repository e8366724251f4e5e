use std::io;

use thiserror::Error;

/// Possible errors that arise from compressing data into a DSC container,
/// or from inspecting an existing one.
#[derive(Error, Debug)]
pub enum DscError {
    #[error("invalid DSC header; found tag {0:?}")]
    InvalidHeader(String),

    #[error("payload of {0} bytes does not fit the 32-bit size field")]
    PayloadTooLarge(usize),

    #[error("no canonical code assigned for symbol {0}")]
    MissingCode(u16),

    #[error(transparent)]
    Io(#[from] io::Error),
}
