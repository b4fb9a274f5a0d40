pub mod fuzzy_matcher;
pub mod normalize;
pub mod synonyms;

pub use fuzzy_matcher::FuzzyMatcher;
pub use synonyms::SynonymTable;
