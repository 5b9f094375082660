//! Bit-packed encoding of editable map state.
//!
//! This is the main codec crate. It turns a [`StateRoot`] (viewport plus drawn
//! markers, lines, polygons and circles with their styles) into a short
//! URL-safe string, and back.
//!
//! # Entry points
//!
//! - [`encode_hash`] / [`decode_hash`] - uncompressed, for shareable links.
//! - [`encode_autosave`] / [`decode_autosave`] - deflated, for larger local saves.
//! - [`decode_hash_or_default`] - logs failures and falls back to an empty map.
//!
//! The record-level `write_*` / `read_*` functions are public for tooling.
//!
//! # Design Principles
//!
//! - **Small output** - Varints, delta-coded paths and sparse styles.
//! - **Stable format** - Tags, type codes and scales never change meaning.
//! - **Strict decoding** - Unknown or out-of-order tags abort the whole decode.
//! - **Bounded decoding** - Counts are checked against [`CodecLimits`] before allocating.
//!
//! # Example
//!
//! ```
//! use codec::{decode_hash, encode_hash, DecodeOptions, MarkerElement, Point, StateElement, StateRoot};
//!
//! let root = StateRoot {
//!     viewport: None,
//!     elements: vec![StateElement::Marker(MarkerElement {
//!         point: Point::new(-180.0, -90.0),
//!         ..MarkerElement::default()
//!     })],
//! };
//! let hash = encode_hash(&root).unwrap();
//! let decoded = decode_hash(&hash, &DecodeOptions::default()).unwrap();
//! assert_eq!(decoded, root);
//! ```

mod color;
mod error;
mod geometry;
mod hash;
mod limits;
mod state;
mod style;
mod tag;
mod text;
mod types;

pub use color::{read_color, write_color, Color};
pub use error::{
    CodecError, CodecResult, ErrorKind, LimitKind, RecordKind, StringReason, ValueField,
    ValueReason,
};
pub use geometry::{
    dequantize_coord, quantize_coord, read_point, read_points, write_point, write_points,
    MAX_COORD_UNITS,
};
pub use hash::{
    decode_autosave, decode_autosave_or_default, decode_hash, decode_hash_or_default,
    decode_state, encode_autosave, encode_hash, encode_state, expect_padding, HASH_PAD_BITS,
    STATE_PAD_BITS,
};
pub use limits::{CodecLimits, DecodeOptions};
pub use state::{
    read_element, read_element_count, read_root, read_viewport, write_element, write_root,
    ROOT_TAG_ELEMENTS, ROOT_TAG_VIEWPORT,
};
pub use style::{read_style, write_style, Style, StyleField, StyleKind};
pub use tag::{read_tag, TagOrder, ELEMENT_TYPE_BITS, END_TAG, TAG_BITS};
pub use text::{read_string, write_string};
pub use types::{
    CircleElement, ElementType, Level, LineElement, MarkerElement, Point, PolygonElement,
    StateElement, StateRoot, Viewport,
};
pub use wire::Limits as WireLimits;
