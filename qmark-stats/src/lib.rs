//! # qmark-stats
//!
//! The crawl/classify/aggregate/report pipeline for a channel where every message should be a single `?`.
//!
//! ## Modules
//!
//! - [`crawler`] – pull-based [`ChannelCrawler`] over a [`MessageSource`]
//! - [`classify`] – valid / anomalous classification
//! - [`aggregate`] – per-author and per-date counts ([`AggregationSnapshot`])
//! - [`report`] – pie and time-series composition, window parsing
//! - [`notifier`] – [`AnomalyNotifier`]
//! - [`pipeline`] – [`ReportContext`] and report entry points
//! - [`retry`] – backoff for rate-limited transport calls

pub mod aggregate;
pub mod classify;
pub mod crawler;
pub mod notifier;
pub mod pipeline;
pub mod report;
pub mod retry;

pub use aggregate::{bucket_date, AggregationSnapshot, Aggregator, AuthorCount, AuthorTally, DateCount};
pub use classify::{classify, Classification, Classified, VALID_CONTENT};
pub use crawler::{ChannelCrawler, CrawlRequest, MessageSource, PageRequest, DEFAULT_PAGE_SIZE};
pub use notifier::{format_notice, AnomalyNotifier, NotifyOutcome, PIN_FAILED_NOTICE};
pub use pipeline::{
    check_and_collect, check_and_collect_since, history_report, pie_report, CrawlOutcome,
    ReportContext,
};
pub use report::{
    compose_pie, compose_time_series, slice_annotation, PieSeries, PieSlice, TimePoint,
    TimeSeries, Window, ANNOTATION_DIVISOR, DEFAULT_WINDOW, FALLBACK_WINDOW_DAYS, OTHER_LABEL,
};
pub use retry::{retry_rate_limited, RetryPolicy};
