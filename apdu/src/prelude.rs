//! Prelude to simplify downstream use of APDU objects
//!

pub use crate::tx::{TxAbort, TxAck, TxChunkReq, TxSign, TxSignFlags, TxSignature};
