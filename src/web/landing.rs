use v_htmlescape::escape;

use super::layout::render_document;
use crate::catalog::{self, PricingPlan};

pub struct MarketStat {
    pub label: &'static str,
    pub value: &'static str,
    pub description: &'static str,
}

pub struct FeatureCard {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const MARKET_STATS: &[MarketStat] = &[
    MarketStat {
        label: "Market Size",
        value: "$109M",
        description: "Annual gig economy revenue",
    },
    MarketStat {
        label: "Growth Rate",
        value: "33%",
        description: "Year-over-year growth",
    },
    MarketStat {
        label: "Target Share",
        value: "30%",
        description: "Market penetration goal",
    },
    MarketStat {
        label: "Workers",
        value: "36,700+",
        description: "Current gig workers",
    },
];

pub const FEATURE_CARDS: &[FeatureCard] = &[
    FeatureCard {
        icon: "&#128101;",
        title: "Unified Platform",
        description: "Connect service providers with clients seamlessly through our centralized marketplace.",
    },
    FeatureCard {
        icon: "&#9889;",
        title: "Quick Matching",
        description: "AI-powered job matching system connects you with the right opportunities instantly.",
    },
    FeatureCard {
        icon: "&#128737;",
        title: "Secure Payments",
        description: "Integrated payment system ensures safe and timely transactions for all parties.",
    },
];

const NAV_ITEMS: [&str; 4] = ["Home", "Features", "Pricing", "About"];

pub struct LandingPageContext {
    pub plans: &'static [PricingPlan],
    pub stats: &'static [MarketStat],
    pub features: &'static [FeatureCard],
}

impl Default for LandingPageContext {
    fn default() -> Self {
        Self {
            plans: catalog::plans(),
            stats: MARKET_STATS,
            features: FEATURE_CARDS,
        }
    }
}

const LANDING_STYLES: &str = r#"
        nav.site-nav {
            position: fixed;
            top: 0;
            width: 100%;
            z-index: 50;
            background: rgba(255, 255, 255, 0.9);
            backdrop-filter: blur(20px);
            border-bottom: 1px solid var(--line);
        }
        .nav-inner {
            max-width: 1200px;
            margin: 0 auto;
            padding: 1rem 1.5rem;
            display: flex;
            align-items: center;
            justify-content: space-between;
        }
        .brand { font-size: 1.25rem; font-weight: 700; text-decoration: none; }
        .nav-links { display: flex; gap: 2rem; }
        .nav-links a { text-decoration: none; color: #374151; }
        .nav-links a:hover { color: #ca8a04; }
        .mobile-menu { display: none; }
        .mobile-menu summary { list-style: none; cursor: pointer; font-size: 1.5rem; }
        .mobile-menu a { display: block; padding: 0.5rem 0; text-decoration: none; }
        @media (max-width: 768px) {
            .nav-links { display: none; }
            .mobile-menu { display: block; }
        }
        section { padding: 5rem 1.5rem; }
        .wrap { max-width: 1200px; margin: 0 auto; }
        .hero { min-height: 100vh; display: flex; align-items: center; text-align: center; padding-top: 7rem; }
        .hero h1 { font-size: clamp(3rem, 7vw, 4.5rem); margin: 0 0 1.5rem; }
        .hero p.lead { font-size: 1.35rem; color: #374151; max-width: 48rem; margin: 0 auto 2rem; }
        .cta-row { display: flex; flex-wrap: wrap; gap: 1rem; justify-content: center; margin-bottom: 3rem; }
        .section-head { text-align: center; margin-bottom: 4rem; }
        .section-head h2 { font-size: clamp(2.25rem, 5vw, 3rem); margin: 0 0 1.25rem; }
        .section-head p { font-size: 1.25rem; color: var(--muted); }
        .grid { display: grid; gap: 2rem; }
        .grid-4 { grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); }
        .grid-3 { grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); }
        .stat { padding: 1.5rem; }
        .stat-value { font-size: 2rem; font-weight: 700; color: #ca8a04; }
        .stat-label { font-weight: 600; margin: 0.4rem 0 0.2rem; }
        .stat-note { font-size: 0.8rem; color: var(--muted); }
        .feature { padding: 2rem; text-align: left; }
        .feature-icon {
            width: 4rem; height: 4rem; border-radius: 14px; margin-bottom: 1.5rem;
            display: flex; align-items: center; justify-content: center; font-size: 1.8rem;
            background: linear-gradient(90deg, var(--yellow), var(--amber));
        }
        .plan { position: relative; padding: 2rem; display: flex; flex-direction: column; }
        .plan.popular { border-color: #facc15; box-shadow: 0 25px 50px rgba(234, 179, 8, 0.25); }
        .plan-tag {
            position: absolute; top: -1rem; left: 50%; transform: translateX(-50%);
            background: linear-gradient(90deg, var(--yellow), var(--amber));
            color: #fff; border-radius: 999px; padding: 0.4rem 1rem; font-size: 0.85rem; font-weight: 600;
        }
        .plan-badge { width: 4rem; height: 4rem; border-radius: 14px; margin: 0 auto 1rem; }
        .plan-head { text-align: center; margin-bottom: 2rem; }
        .plan-head h3 { font-size: 1.5rem; margin: 0 0 0.5rem; }
        .plan-price { font-size: 2.25rem; font-weight: 700; }
        .plan-period { color: #6b7280; margin-left: 0.5rem; }
        .plan ul { list-style: none; padding: 0; margin: 0 0 2rem; flex: 1; }
        .plan li { padding: 0.5rem 0; color: #374151; }
        .plan li::before { content: "\2713"; color: #16a34a; margin-right: 0.75rem; font-weight: 700; }
        .plan .btn { border-radius: 14px; width: 100%; }
        .about { padding: 3rem; }
        .about-grid { display: grid; gap: 3rem; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); align-items: center; }
        .about p { font-size: 1.1rem; line-height: 1.7; color: #374151; }
        .figures { display: flex; gap: 1.5rem; }
        .figures strong { display: block; font-size: 1.5rem; color: #ca8a04; }
        .figures span { font-size: 0.85rem; color: var(--muted); }
        .mission { padding: 2rem; }
        .mission h3 { font-size: 1.5rem; margin: 0 0 1rem; }
        .footer-brand { display: block; font-size: 1.25rem; color: var(--ink); }
        footer { text-align: center; padding: 3rem 1.5rem; color: var(--muted); border-top: 1px solid var(--line); }
"#;

pub fn render_landing_page(context: &LandingPageContext) -> String {
    let body = format!(
        r##"<nav class="site-nav">
    <div class="nav-inner">
        <a class="brand" href="#home">Tawala App</a>
        <div class="nav-links">{nav_links}</div>
        <details class="mobile-menu">
            <summary aria-label="Toggle menu">&#9776;</summary>
            {nav_links}
        </details>
    </div>
</nav>
<section id="home" class="hero">
    <div class="wrap">
        <h1 class="gradient-text">Welcome to Tawala</h1>
        <p class="lead">Revolutionizing Kenya&#39;s gig economy by connecting professionals with clients in need of short-term services</p>
        <div class="cta-row">
            <a class="btn btn-primary" href="#pricing">Download from Play Store</a>
            <a class="btn btn-outline" href="#about">Learn More</a>
        </div>
        <div class="grid grid-4">{stats}</div>
    </div>
</section>
<section id="features">
    <div class="wrap">
        <div class="section-head">
            <h2 class="gradient-text">Powerful Features</h2>
            <p>Everything you need to succeed in the gig economy</p>
        </div>
        <div class="grid grid-3">{features}</div>
    </div>
</section>
<section id="pricing">
    <div class="wrap">
        <div class="section-head">
            <h2 class="gradient-text">Choose Your Plan</h2>
            <p>Flexible subscription plans designed for every stage of your journey</p>
        </div>
        <div class="grid grid-3">{plans}</div>
    </div>
</section>
<section id="about">
    <div class="wrap glass about">
        <div class="about-grid">
            <div>
                <h2 class="gradient-text">About Tawala</h2>
                <p>Tawala is revolutionizing Kenya&#39;s gig economy by providing a unified platform that connects professionals with clients seeking short-term services, particularly in event management and beyond.</p>
                <p>With Kenya&#39;s gig economy valued at $109 million and growing at 33% annually, we&#39;re positioned to capture 30% of this market through our innovative subscription model and comprehensive service offerings.</p>
                <div class="figures">
                    <div><strong>$10.8B</strong><span>Digital Economy</span></div>
                    <div><strong>5%</strong><span>GDP Growth</span></div>
                    <div><strong>33%</strong><span>Gig Growth</span></div>
                </div>
            </div>
            <div class="glass mission">
                <h3>Our Mission</h3>
                <p>To empower gig workers and businesses by providing a seamless platform that simplifies job access and service hiring, becoming the leading digital marketplace for gig economy services in Kenya and beyond.</p>
            </div>
        </div>
    </div>
</section>
<footer>
    <strong class="footer-brand">Tawala</strong>
    <p>Revolutionizing the gig economy in Kenya</p>
    <small>&copy; 2024 Tawala. All rights reserved.</small>
</footer>"##,
        nav_links = render_nav_links(),
        stats = context.stats.iter().map(render_stat).collect::<String>(),
        features = context.features.iter().map(render_feature).collect::<String>(),
        plans = context.plans.iter().map(render_plan_card).collect::<String>(),
    );

    render_document(
        "Tawala - Revolutionizing Kenya's Gig Economy",
        LANDING_STYLES,
        &body,
    )
}

fn render_nav_links() -> String {
    NAV_ITEMS
        .iter()
        .map(|item| {
            format!(
                r##"<a href="#{anchor}">{item}</a>"##,
                anchor = item.to_ascii_lowercase(),
                item = item
            )
        })
        .collect()
}

fn render_stat(stat: &MarketStat) -> String {
    format!(
        r#"<div class="glass stat"><div class="stat-value">{}</div><div class="stat-label">{}</div><div class="stat-note">{}</div></div>"#,
        escape(stat.value),
        escape(stat.label),
        escape(stat.description)
    )
}

fn render_feature(feature: &FeatureCard) -> String {
    format!(
        r#"<div class="glass feature"><div class="feature-icon">{}</div><h3>{}</h3><p>{}</p></div>"#,
        feature.icon,
        escape(feature.title),
        escape(feature.description)
    )
}

pub fn render_plan_card(plan: &PricingPlan) -> String {
    let features: String = plan
        .features
        .iter()
        .map(|feature| format!("<li>{}</li>", escape(feature)))
        .collect();
    let (popular_class, tag, button_class) = if plan.popular {
        (
            " popular",
            r#"<div class="plan-tag">Most Popular</div>"#,
            "btn-primary",
        )
    } else {
        ("", "", "btn-outline")
    };

    format!(
        r#"<div class="glass plan{popular_class}" id="plan-{id}">
    {tag}
    <div class="plan-head">
        <div class="plan-badge" style="background: linear-gradient(90deg, {from}, {to});"></div>
        <h3>{name}</h3>
        <p>{description}</p>
        <div><span class="plan-price">{price}</span><span class="plan-period">{period}</span></div>
    </div>
    <ul>{features}</ul>
    <a class="btn {button_class}" href="{href}">Get Started</a>
</div>"#,
        popular_class = popular_class,
        tag = tag,
        id = plan.id,
        from = plan.color.0,
        to = plan.color.1,
        name = escape(plan.name),
        description = escape(plan.description),
        price = escape(&plan.display_price()),
        period = escape(plan.period),
        features = features,
        button_class = button_class,
        href = escape(&plan.checkout_href()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_plan_links_to_checkout() {
        let html = render_landing_page(&LandingPageContext::default());
        for plan in catalog::plans() {
            assert!(html.contains(&format!(r#"href="/payment?plan={}""#, plan.id)));
        }
        assert!(html.contains("KES 2,000"));
        assert_eq!(html.matches("Most Popular").count(), 1);
    }

    #[test]
    fn renders_every_section_anchor() {
        let html = render_landing_page(&LandingPageContext::default());
        for anchor in ["home", "features", "pricing", "about"] {
            assert!(html.contains(&format!(r#"id="{anchor}""#)), "{anchor}");
        }
        assert!(html.contains("36,700+"));
    }

    #[test]
    fn about_and_footer_carry_mission_and_copyright() {
        let html = render_landing_page(&LandingPageContext::default());
        assert!(html.contains("<h3>Our Mission</h3>"));
        assert!(html.contains("Revolutionizing the gig economy in Kenya"));
        assert!(html.contains("&copy; 2024 Tawala. All rights reserved."));
    }
}
