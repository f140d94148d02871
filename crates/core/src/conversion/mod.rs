//! Currency conversions and deposits.

pub mod processor;
pub mod types;

#[cfg(test)]
mod props;

pub use processor::{ConversionProcessor, converted_amount};
pub use types::{
    ConversionDetails, ConversionDetailsInput, ConversionKind, ConversionRecord, ConversionRequest,
};
