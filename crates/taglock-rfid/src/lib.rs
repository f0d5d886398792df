//! Tag decoder for the RDM6300-class RFID reader.
//!
//! Couples the pure wire-format functions from `taglock-protocol` with
//! a blocking byte source and an injected clock to produce debounced
//! tag reads. The reader transmits continuously while a tag is held in
//! range; the decoder's idle window collapses that stream into one
//! accepted read per presence event.

mod decoder;

pub use decoder::{TagDecoder, TagRead};
