//! Core diary logic without I/O operations.
//!
//! This module contains the pure building blocks the query engine composes:
//! tag extraction and excerpts (`text`), page normalization (`pagination`) and
//! date bucketing for statistics (`dates`). Nothing here touches the database
//! or reads configuration.

pub mod dates;
pub mod pagination;
pub mod text;

pub use dates::{bucket_key, days_in_month, month_day, Granularity, MonthDay};
pub use pagination::{build_pagination_result, normalize_pagination, Page, PageRequest};
pub use text::{extract_tags, generate_excerpt, merge_tags, split_tag_list, validate_diary_date};
