use crate::date_util::format_thousands;
use crate::order::Category;
use crate::report::metrics::RollingMetrics;
use crate::report::summary::SalesSummary;

/// Render a summary + metrics into the final report text.
///
/// Section order is fixed: header, revenue, customers, product breakdown,
/// payment and delivery lists, performance metrics, then the optional
/// insight. Flavors appear in first-seen order from the source data, not
/// alphabetically. Pure function; the caller owns delivery.
pub fn render_report(
    summary: &SalesSummary,
    metrics: &RollingMetrics,
    insight: Option<&str>,
    label: &str,
    currency: &str,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("📊 Sales Report for {label}\n\n"));

    if summary.is_empty() {
        out.push_str("No sales recorded for this period.\n");
    } else {
        out.push_str(&format!(
            "💰 Revenue: {currency}{} | Paid {currency}{} | Unpaid {currency}{}\n",
            format_thousands(summary.total_revenue),
            format_thousands(summary.paid_revenue),
            format_thousands(summary.unpaid_revenue),
        ));
        out.push_str(&format!("👥 {} Customers\n", summary.customer_count));
        out.push_str(&numbered(&summary.customers));
        out.push('\n');

        out.push_str("\n✏️ Order:\n");
        for category in [Category::Pouch, Category::Tub] {
            let lines: Vec<_> = summary
                .products
                .iter()
                .filter(|p| p.category == category)
                .collect();
            if lines.is_empty() {
                continue;
            }
            out.push_str(&format!(
                "{} ({})\n",
                category.plural(),
                summary.units_for(category)
            ));
            let flavors: Vec<String> = lines
                .iter()
                .map(|p| format!("{} {}", p.flavor, p.units))
                .collect();
            out.push_str(&flavors.join(" | "));
            out.push('\n');
        }

        out.push_str(&format!(
            "\n💳 Payment:\nPaid ({}):\n{}\nUnpaid ({}):\n{}\n",
            summary.paid_customers.len(),
            numbered(&summary.paid_customers),
            summary.unpaid_customers.len(),
            numbered(&summary.unpaid_customers),
        ));

        out.push_str(&format!(
            "\n🚚 Delivery:\nUndelivered ({}):\n{}\n",
            summary.undelivered_customers.len(),
            numbered(&summary.undelivered_customers),
        ));
    }

    out.push_str(&format!(
        "\n📈 Performance:\n7-day avg: {currency}{} | 30-day avg: {currency}{}\nTarget streak: {} day{}\n",
        format_thousands(metrics.avg_7d),
        format_thousands(metrics.avg_30d),
        metrics.target_streak,
        if metrics.target_streak == 1 { "" } else { "s" },
    ));

    if let Some(insight) = insight {
        out.push_str(&format!("\n🎇 Insights:\n{}\n", insight.trim()));
    }

    out
}

fn numbered(names: &[String]) -> String {
    if names.is_empty() {
        return "None".to_string();
    }
    names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {name}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{Category, DeliveryStatus, Order, PaymentStatus};
    use crate::report::period::ReportPeriod;
    use chrono::NaiveDate;

    fn sample_summary() -> SalesSummary {
        let d = NaiveDate::from_ymd_opt(2024, 12, 10).unwrap();
        let orders = vec![
            Order {
                date: d,
                customer: "Ana".to_string(),
                category: Category::Pouch,
                flavor: "Cheese".to_string(),
                quantity: 10,
                unit_price: 50.0,
                payment: PaymentStatus::Paid,
                delivery: DeliveryStatus::Delivered,
            },
            Order {
                date: d,
                customer: "Ben".to_string(),
                category: Category::Tub,
                flavor: "Cheese".to_string(),
                quantity: 3,
                unit_price: 150.0,
                payment: PaymentStatus::Unpaid,
                delivery: DeliveryStatus::Pending,
            },
        ];
        SalesSummary::aggregate(&orders, &ReportPeriod::Day(d))
    }

    #[test]
    fn test_render_full_report() {
        let metrics = RollingMetrics {
            avg_7d: 950.0,
            avg_30d: 1250.5,
            target_streak: 3,
        };
        let text = render_report(&sample_summary(), &metrics, None, "Dec 10, 2024", "₱");

        assert!(text.contains("📊 Sales Report for Dec 10, 2024"));
        assert!(text.contains("💰 Revenue: ₱950 | Paid ₱500 | Unpaid ₱450"));
        assert!(text.contains("👥 2 Customers"));
        assert!(text.contains("Pouches (10)"));
        assert!(text.contains("Tubs (3)"));
        assert!(text.contains("Cheese 10"));
        assert!(text.contains("7-day avg: ₱950 | 30-day avg: ₱1,251"));
        assert!(text.contains("Target streak: 3 days"));
        assert!(!text.contains("Insights"));
    }

    #[test]
    fn test_render_deterministic() {
        let metrics = RollingMetrics::default();
        let summary = sample_summary();
        let a = render_report(&summary, &metrics, None, "Dec 10, 2024", "₱");
        let b = render_report(&summary, &metrics, None, "Dec 10, 2024", "₱");
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_empty_summary() {
        let text = render_report(
            &SalesSummary::default(),
            &RollingMetrics::default(),
            None,
            "Jan 01, 2025",
            "₱",
        );
        assert!(text.contains("No sales recorded"));
        assert!(!text.contains("Pouches"));
        assert!(!text.contains("Tubs"));
        assert!(!text.contains("Revenue:"));
    }

    #[test]
    fn test_insight_appended_last() {
        let text = render_report(
            &sample_summary(),
            &RollingMetrics::default(),
            Some("Strong cheese day."),
            "Dec 10, 2024",
            "₱",
        );
        let insight_pos = text.find("🎇 Insights:").unwrap();
        let metrics_pos = text.find("📈 Performance:").unwrap();
        assert!(insight_pos > metrics_pos);
        assert!(text.trim_end().ends_with("Strong cheese day."));
    }

    #[test]
    fn test_singular_streak_day() {
        let metrics = RollingMetrics {
            target_streak: 1,
            ..RollingMetrics::default()
        };
        let text = render_report(&sample_summary(), &metrics, None, "Dec 10, 2024", "₱");
        assert!(text.contains("Target streak: 1 day\n"));
    }
}
