//! Chart-ready series derived from a [`CalculationResult`].
//!
//! Values pass through untouched: zero, negative and non-finite figures are
//! the renderer's problem, and nothing here checks that the donut and bar
//! series agree with each other.

use serde::Serialize;

use crate::models::CalculationResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonutSeries {
    pub tax_owed: f64,
    pub after_tax_income: f64,
}

impl DonutSeries {
    pub fn points(&self) -> [(&'static str, f64); 2] {
        [
            ("Tax Owed", self.tax_owed),
            ("After Tax Income", self.after_tax_income),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarSeries {
    pub gross_income: f64,
    pub taxable_income: f64,
    pub after_tax_income: f64,
}

impl BarSeries {
    pub fn points(&self) -> [(&'static str, f64); 3] {
        [
            ("Gross Income", self.gross_income),
            ("Taxable Income", self.taxable_income),
            ("After Tax Income", self.after_tax_income),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartSeries {
    pub donut: DonutSeries,
    pub bar: BarSeries,
}

pub fn derive_charts(result: &CalculationResult) -> ChartSeries {
    ChartSeries {
        donut: DonutSeries {
            tax_owed: result.tax_owed,
            after_tax_income: result.after_tax_income,
        },
        bar: BarSeries {
            gross_income: result.gross_income,
            taxable_income: result.taxable_income,
            after_tax_income: result.after_tax_income,
        },
    }
}

/// Headline figures shown above the charts on the result view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SummaryValue {
    Amount(f64),
    Percent(f64),
}

pub fn summary_cards(result: &CalculationResult) -> [(&'static str, SummaryValue); 4] {
    [
        ("Gross Income", SummaryValue::Amount(result.gross_income)),
        (
            "Total Deductions",
            SummaryValue::Amount(result.total_deductions),
        ),
        ("Tax Owed", SummaryValue::Amount(result.tax_owed)),
        (
            "Effective Tax Rate",
            SummaryValue::Percent(result.effective_tax_rate),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CalculationResult {
        CalculationResult {
            gross_income: 6_000_000.0,
            total_deductions: 1_200_000.0,
            taxable_income: 4_800_000.0,
            tax_owed: 720_000.0,
            effective_tax_rate: 12.0,
            after_tax_income: 5_280_000.0,
        }
    }

    #[test]
    fn selects_fields_for_each_series() {
        let charts = derive_charts(&sample());

        assert_eq!(charts.donut.tax_owed, 720_000.0);
        assert_eq!(charts.donut.after_tax_income, 5_280_000.0);
        assert_eq!(charts.bar.gross_income, 6_000_000.0);
        assert_eq!(charts.bar.taxable_income, 4_800_000.0);
        assert_eq!(charts.bar.after_tax_income, 5_280_000.0);
    }

    #[test]
    fn is_deterministic() {
        let result = sample();
        assert_eq!(derive_charts(&result), derive_charts(&result));
    }

    #[test]
    fn passes_through_zero_and_negative_values() {
        let result = CalculationResult {
            gross_income: 0.0,
            taxable_income: -250.0,
            tax_owed: -10.0,
            after_tax_income: 99.0,
            ..Default::default()
        };

        let charts = derive_charts(&result);
        assert_eq!(charts.donut.tax_owed, -10.0);
        assert_eq!(charts.bar.gross_income, 0.0);
        assert_eq!(charts.bar.taxable_income, -250.0);
    }

    #[test]
    fn does_not_reconcile_series() {
        // donut parts need not add up to gross income
        let result = CalculationResult {
            gross_income: 100.0,
            tax_owed: 80.0,
            after_tax_income: 80.0,
            ..Default::default()
        };

        let charts = derive_charts(&result);
        assert_eq!(
            charts.donut.tax_owed + charts.donut.after_tax_income,
            160.0
        );
        assert_eq!(charts.bar.gross_income, 100.0);
    }

    #[test]
    fn points_carry_labels_in_display_order() {
        let charts = derive_charts(&sample());
        let labels: Vec<_> = charts.bar.points().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, ["Gross Income", "Taxable Income", "After Tax Income"]);
        assert_eq!(charts.donut.points()[0], ("Tax Owed", 720_000.0));

        let cards = summary_cards(&sample());
        assert_eq!(cards[3], ("Effective Tax Rate", SummaryValue::Percent(12.0)));
    }
}
