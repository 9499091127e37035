//! Statistics helpers for the qtris workspace.
//!
//! - [`summary`]: running summary (count, min, max, mean, variance, standard deviation)
//!
//! ```
//! use qtris_stats::summary::Summary;
//!
//! let summary: Summary = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter().collect();
//! assert_eq!(summary.mean(), Some(5.0));
//! assert_eq!(summary.std_dev(), Some(2.0));
//! ```

pub mod summary;
