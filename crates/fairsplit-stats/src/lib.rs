//! Small statistical toolbox used by the balancing engine.
//!
//! - **Descriptive statistics**: mean, median, variance, standard deviation and the
//!   coefficient of variation of a sample
//! - **Percentiles**: nearest-rank percentiles, used for pool-relative star thresholds
//! - **Entropy**: normalized Shannon entropy of a category histogram, used to measure
//!   how diverse a pool's specialist mix is
//!
//! # Examples
//!
//! ```
//! use fairsplit_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ```
//! use fairsplit_stats::percentiles::percentile;
//!
//! let values = [60.0, 70.0, 80.0, 90.0];
//! assert_eq!(percentile(&values, 75.0), Some(90.0));
//! ```
//!
//! ```
//! use fairsplit_stats::entropy::normalized_entropy;
//!
//! // Perfectly even histogram over four categories
//! assert!((normalized_entropy(&[2, 2, 2, 2]) - 1.0).abs() < 1e-6);
//! ```

pub mod descriptive;
pub mod entropy;
pub mod percentiles;
