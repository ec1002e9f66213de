//! Classification tables for Indonesian local-government units.
//!
//! - [classify_title]: unit name + echelon (+ parent name) -> full position title
//! - [simplify_title]: full title -> generic title used for grouping
//! - [classify_code]: title + unit name -> short title code
//!
//! All three are pure and total; rule order lives in the `const` tables.

mod code;
mod simplify;
mod title;

pub use code::{classify_code, CategoryCode, CATEGORY_CODES, DEFAULT_CODE, EXACT_CODES, FALLBACK_CODES};
pub use simplify::{simplify_title, FIXED_TITLES, KEYWORD_TITLES, SIMPLIFY_RULES};
pub use title::{
    classify_title, matching_rule, NamePattern, TitleRule, TitleTemplate, DEFAULT_LEAD_TITLE,
    DEFAULT_TOP_TITLE, DEFAULT_UNRANKED_TITLE, TITLE_RULES,
};
