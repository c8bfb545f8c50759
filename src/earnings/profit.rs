use serde::Serialize;
use utoipa::ToSchema;

/// Rates agreed for one batch of incoming work. Missing rates count as zero.
pub trait JobRates {
    fn quantity(&self) -> u32;
    fn client_price(&self) -> Option<f64>;
    fn worker_cost(&self) -> Option<f64>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct JobProfit {
    pub unit_margin: f64,
    pub revenue: f64,
    pub worker_cost: f64,
    pub profit: f64,
}

impl JobProfit {
    pub fn of<J: JobRates + ?Sized>(job: &J) -> Self {
        let qty = f64::from(job.quantity());
        let client = job.client_price().unwrap_or(0.0);
        let worker = job.worker_cost().unwrap_or(0.0);
        let unit_margin = client - worker;
        Self {
            unit_margin,
            revenue: client * qty,
            worker_cost: worker * qty,
            profit: unit_margin * qty,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct ProfitSummary {
    pub total_quantity: u64,
    pub total_revenue: f64,
    pub total_worker_cost: f64,
    pub admin_profit: f64,
}

pub fn summarize_profit<'a, J, I>(jobs: I) -> ProfitSummary
where
    J: JobRates + 'a,
    I: IntoIterator<Item = &'a J>,
{
    let mut summary = jobs
        .into_iter()
        .fold(ProfitSummary::default(), |mut acc, job| {
            let p = JobProfit::of(job);
            acc.total_quantity += u64::from(job.quantity());
            acc.total_revenue += p.revenue;
            acc.total_worker_cost += p.worker_cost;
            acc
        });
    summary.admin_profit = summary.total_revenue - summary.total_worker_cost;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Batch(u32, Option<f64>, Option<f64>);

    impl JobRates for Batch {
        fn quantity(&self) -> u32 {
            self.0
        }
        fn client_price(&self) -> Option<f64> {
            self.1
        }
        fn worker_cost(&self) -> Option<f64> {
            self.2
        }
    }

    #[test]
    fn profit_is_margin_times_quantity() {
        let p = JobProfit::of(&Batch(100, Some(5000.0), Some(3000.0)));
        assert_eq!(p.unit_margin, 2000.0);
        assert_eq!(p.profit, 200_000.0);
        assert_eq!(p.revenue - p.worker_cost, p.profit);
    }

    #[test]
    fn missing_rates_are_zero() {
        let p = JobProfit::of(&Batch(10, None, Some(300.0)));
        assert_eq!(p.revenue, 0.0);
        assert_eq!(p.profit, -3000.0);
        assert_eq!(JobProfit::of(&Batch(10, None, None)), JobProfit::default());
    }

    #[test]
    fn summary_adds_up() {
        let jobs = vec![
            Batch(100, Some(5000.0), Some(3000.0)),
            Batch(20, Some(1000.0), None),
        ];
        let s = summarize_profit(&jobs);
        assert_eq!(s.total_quantity, 120);
        assert_eq!(s.total_revenue, 520_000.0);
        assert_eq!(s.total_worker_cost, 300_000.0);
        assert_eq!(s.admin_profit, 220_000.0);
    }
}
