use serde::Serialize;

pub const CURRENCY: &str = "KES";

/// A subscription tier offered on the landing page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PricingPlan {
    pub id: &'static str,
    pub name: &'static str,
    /// Whole shillings, no minor units.
    pub price: u32,
    pub period: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    /// Gradient stops used for the plan badge, `from` then `to`.
    pub color: (&'static str, &'static str),
    pub popular: bool,
}

impl PricingPlan {
    /// Price as shown in the order summary, e.g. `KES 2000`.
    pub fn amount_label(&self) -> String {
        format!("{CURRENCY} {}", self.price)
    }

    /// Price as shown on the pricing table, e.g. `KES 2,000`.
    pub fn display_price(&self) -> String {
        format!("{CURRENCY} {}", group_thousands(self.price))
    }

    pub fn checkout_href(&self) -> String {
        format!("/payment?plan={}", self.id)
    }
}

pub const PRICING_PLANS: &[PricingPlan] = &[
    PricingPlan {
        id: "bronze",
        name: "Bronze",
        price: 1000,
        period: "/month",
        description: "Perfect for getting started",
        features: &[
            "Basic profile listing",
            "Limited visibility",
            "Standard support",
            "Basic analytics",
        ],
        color: ("#fbbf24", "#f97316"),
        popular: false,
    },
    PricingPlan {
        id: "silver",
        name: "Silver",
        price: 2000,
        period: "/month",
        description: "Enhanced visibility and tools",
        features: &[
            "Enhanced visibility",
            "Customer insights",
            "Job alerts",
            "Priority support",
            "Advanced analytics",
        ],
        color: ("#9ca3af", "#4b5563"),
        popular: true,
    },
    PricingPlan {
        id: "gold",
        name: "Gold",
        price: 3000,
        period: "/month",
        description: "Maximum features and visibility",
        features: &[
            "Maximum visibility",
            "Premium tools",
            "Featured listings",
            "Customer management",
            "Dedicated support",
            "Full analytics suite",
        ],
        color: ("#facc15", "#ca8a04"),
        popular: false,
    },
];

pub fn plans() -> &'static [PricingPlan] {
    PRICING_PLANS
}

/// Exact id match; `Silver` or ` silver` are not plan ids.
pub fn find_plan(id: &str) -> Option<&'static PricingPlan> {
    PRICING_PLANS.iter().find(|plan| plan.id == id)
}

/// Plan for a `plan=<id>` query value. Missing or unknown ids fall back to the
/// first catalog entry.
pub fn resolve_plan(id: Option<&str>) -> &'static PricingPlan {
    id.and_then(find_plan).unwrap_or(&PRICING_PLANS[0])
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silver_resolves_to_its_price_and_name() {
        let plan = resolve_plan(Some("silver"));
        assert_eq!(plan.price, 2000);
        assert_eq!(plan.name, "Silver");
        assert!(plan.popular);
    }

    #[test]
    fn unknown_or_missing_plan_falls_back_to_bronze() {
        assert_eq!(resolve_plan(None).id, "bronze");
        assert_eq!(resolve_plan(Some("platinum")).id, "bronze");
        assert_eq!(resolve_plan(Some("")).id, "bronze");
        assert_eq!(resolve_plan(Some("SILVER")).id, "bronze");
        assert_eq!(resolve_plan(Some(" silver ")).id, "bronze");
    }

    #[test]
    fn plan_ids_are_unique() {
        let mut ids: Vec<_> = plans().iter().map(|plan| plan.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), plans().len());
    }

    #[test]
    fn formats_prices_for_table_and_summary() {
        let gold = find_plan("gold").expect("gold plan");
        assert_eq!(gold.display_price(), "KES 3,000");
        assert_eq!(gold.amount_label(), "KES 3000");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_250_000), "1,250,000");
    }
}
