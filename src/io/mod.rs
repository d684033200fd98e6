//! Stream access, framing checks, batch decoding and the range reader.

pub mod fs;
pub mod reader;

pub(crate) mod decode;
pub(crate) mod framing;

#[cfg_attr(docsrs, doc(cfg(feature = "parallel-io")))]
#[cfg(feature = "parallel-io")]
pub mod parallel;
