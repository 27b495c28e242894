//! Group filter expression parsing and matching
//!
//! Every log event declares a group (or several groups joined with `|`),
//! and the logger holds a filter expression deciding which groups get
//! written. Flipping the expression at runtime turns whole areas of
//! logging on and off without touching the call sites.
//!
//! # Syntax
//!
//! ```text
//! all              Match every event, grouped or not
//! (empty string)   Match nothing; logging is off
//! A|B|C            Match events declaring group A, B or C
//! ```
//!
//! Matching is by exact token: an event group `AB` never matches a filter
//! token `A`. An event may declare several groups (`D|A|B`) and passes if
//! any one of them is in the filter.
//!
//! # Examples
//!
//! ```
//! use grouplog::GroupFilter;
//!
//! let filter = GroupFilter::parse("db|cache");
//! assert!(filter.allows("cache"));
//! assert!(filter.allows("net|db"));
//! assert!(!filter.allows("net"));
//! ```

mod expression;

pub use expression::GroupFilter;
