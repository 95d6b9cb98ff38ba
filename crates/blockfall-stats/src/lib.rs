//! Summary statistics for training progress reports.
//!
//! # Examples
//!
//! ```
//! use blockfall_stats::descriptive::DescriptiveStats;
//!
//! let fitness = [12.0, 40.0, 3.0, 25.0];
//! let stats = DescriptiveStats::new(fitness).unwrap();
//! assert_eq!(stats.max, 40.0);
//! assert_eq!(stats.mean, 20.0);
//! ```

pub mod descriptive;
