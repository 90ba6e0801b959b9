//! Pure string handling: normalization and title splitting. No I/O.

pub mod normalize;
pub mod pattern;

pub use normalize::{
    normalize_artist, normalize_query_term, normalize_title, normalize_whitespace_and_controls,
};
pub use pattern::{TitleStyle, split_dash, split_title_artist};
