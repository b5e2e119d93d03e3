pub mod segmenter;

pub use segmenter::*;
