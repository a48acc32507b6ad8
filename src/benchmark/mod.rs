//! Comparison of observed spending against annual reference figures.

mod comparator;
mod mappings;

pub(crate) use comparator::{
    annual_to_weekly, load_reference_data, BenchmarkComparator, CategoryMapping, Comparison,
};
pub(crate) use mappings::default_category_mapping;
