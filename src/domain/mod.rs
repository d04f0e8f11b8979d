//! Domain facades.

mod suggest;

pub use suggest::SuggestDomain;
