//! Interchange values for engineering variables
//!
//! A closed set of value kinds (real, integer, boolean, string, file and the
//! arrays of the first four) with one metadata type each, a visitor core for
//! adding operations, the implicit/explicit conversion graph, and three codecs:
//! API string, display string and binary block.
//!
//! ```rust
//! use varinterop_value::prelude::*;
//!
//! let reals = convert(
//!     &Value::from(Array::from_vec(vec![1_i64, 2, 3])),
//!     ValueKind::RealArray,
//!     ConversionMode::ImplicitOnly,
//! )?;
//! assert_eq!(to_api_string(&reals), "1.0,2.0,3.0");
//!
//! let back = from_binary(&to_binary(&reals)?, ValueKind::RealArray)?;
//! assert!(back.identical(&reals));
//! # Ok::<(), ValueError>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod codec;
pub mod convert;
pub mod error;
pub mod kind;
pub mod metadata;
pub mod ops;
pub mod value;
pub mod visitor;

pub use codec::{
    DisplayLocale, from_api_string, from_binary, to_api_string, to_binary, to_display_string,
    to_localized_display_string,
};
pub use convert::{
    ConversionEdge, ConversionMode, TypeCompatibility, convert, convert_implicit, linking_rules,
};
pub use error::{ErrorCategory, ValueError, ValueResult};
pub use kind::ValueKind;
pub use metadata::{
    BooleanMetadata, CommonMetadata, CustomMetadata, Enumeration, FileMetadata, IntegerMetadata,
    Metadata, MetadataVisitor, RealMetadata, StringMetadata,
};
pub use value::{Array, ContentId, FileValue, Shape, Value, VariableState};
pub use visitor::{KindVisitor, ValueVisitor};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Array, ConversionMode, FileValue, Metadata, Value, ValueError, ValueKind, ValueResult,
        ValueVisitor, VariableState, convert, from_api_string, from_binary, to_api_string,
        to_binary, to_display_string,
    };
}
