/// State management module
///
/// This module handles all application data, including:
/// - The canonical coin record and its normalizer (coin.rs)
/// - The persisted collection and its store file (collection.rs)
/// - Pure filter/sort/aggregate views over the collection (derive.rs)

pub mod coin;
pub mod collection;
pub mod derive;
