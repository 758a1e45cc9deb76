//! Plain-text stand-ins for the result and assistant views.

use std::fmt::Write;
use tax_flow::{CalculationResult, ChatMessage, MessageRole, SummaryValue, derive_charts, summary_cards};

const BAR_WIDTH: usize = 40;

pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return format!("₦{}", value);
    }
    let negative = value < 0.0;
    let rounded = value.abs().round() as u64;
    let digits = rounded.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative && rounded != 0 {
        format!("-₦{}", grouped)
    } else {
        format!("₦{}", grouped)
    }
}

fn format_summary(value: SummaryValue) -> String {
    match value {
        SummaryValue::Amount(amount) => format_amount(amount),
        SummaryValue::Percent(rate) => format!("{}%", rate),
    }
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || !value.is_finite() || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.min(BAR_WIDTH))
}

fn render_series(out: &mut String, points: &[(&'static str, f64)]) {
    let max = points.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    for (label, value) in points {
        let _ = writeln!(
            out,
            "  {:<18} {:>16}  {}",
            label,
            format_amount(*value),
            bar(*value, max)
        );
    }
}

pub fn render_result(result: &CalculationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Your 2026 Tax Breakdown");
    let _ = writeln!(out);

    for (label, value) in summary_cards(result) {
        let _ = writeln!(out, "  {:<20} {}", label, format_summary(value));
    }

    let charts = derive_charts(result);
    let _ = writeln!(out);
    let _ = writeln!(out, "Income Distribution (Tax Owed vs. After-Tax Income)");
    render_series(&mut out, &charts.donut.points());
    let _ = writeln!(out);
    let _ = writeln!(out, "Income Overview");
    render_series(&mut out, &charts.bar.points());
    out
}

pub fn render_messages(messages: &[ChatMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        let speaker = match message.role {
            MessageRole::User => "You",
            MessageRole::Assistant => "Assistant",
        };
        let _ = writeln!(out, "{}: {}", speaker, message.content);
        let _ = writeln!(out);
    }
    out
}

pub fn render_suggestions(prompts: &[&str]) -> String {
    let mut out = String::from("Suggested questions:\n");
    for (i, prompt) in prompts.iter().enumerate() {
        let _ = writeln!(out, "  /{} {}", i + 1, prompt);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_amounts_with_grouping() {
        assert_eq!(format_amount(0.0), "₦0");
        assert_eq!(format_amount(999.0), "₦999");
        assert_eq!(format_amount(1000.0), "₦1,000");
        assert_eq!(format_amount(5_385_600.4), "₦5,385,600");
        assert_eq!(format_amount(-12_500.0), "-₦12,500");
    }

    #[test]
    fn result_view_shows_real_figures() {
        let result = CalculationResult {
            gross_income: 6_300_000.0,
            total_deductions: 1_385_000.0,
            taxable_income: 4_915_000.0,
            tax_owed: 737_250.0,
            effective_tax_rate: 11.7,
            after_tax_income: 5_562_750.0,
        };

        let view = render_result(&result);
        assert!(view.contains("₦6,300,000"));
        assert!(view.contains("₦1,385,000"));
        assert!(view.contains("11.7%"));
        assert!(view.contains("Taxable Income"));
    }

    #[test]
    fn bars_scale_to_largest_value() {
        assert_eq!(bar(10.0, 10.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(5.0, 10.0).chars().count(), BAR_WIDTH / 2);
        assert!(bar(-5.0, 10.0).is_empty());
        assert!(bar(5.0, 0.0).is_empty());
    }

    #[test]
    fn messages_are_labelled_by_role() {
        let view = render_messages(&[ChatMessage::user("hi"), ChatMessage::assistant("hello")]);
        assert!(view.starts_with("You: hi\n"));
        assert!(view.contains("Assistant: hello\n"));
    }
}
