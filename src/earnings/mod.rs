//! Piecework arithmetic shared by the dashboard, earnings, payroll and revenue views.
//!
//! Everything here is pure and infallible; handlers fetch rows and feed them in.

pub mod aggregator;
pub mod date_range;
pub mod payroll_status;
pub mod profit;
pub mod series;

pub use aggregator::{Aggregation, LineValue, Totals, summarize};
pub use date_range::{DateRange, Dated, trailing_months};
pub use payroll_status::PayrollStatus;
pub use profit::{JobProfit, JobRates, ProfitSummary, summarize_profit};
pub use series::{GrowthPoint, TrendPoint, growth_series, month_label};
