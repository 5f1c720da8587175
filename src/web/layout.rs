use v_htmlescape::escape;

pub const SITE_NAME: &str = "Tawala";
pub const SITE_URL: &str = "https://tawala-web.vercel.app/";
pub const SITE_DESCRIPTION: &str = "Connect with professionals for short-term services. Join Kenya's leading gig economy platform that bridges the gap between service providers and clients.";

const BASE_STYLES: &str = r#"
        :root {
            color-scheme: light;
            --amber: #f59e0b;
            --amber-dark: #d97706;
            --yellow: #eab308;
            --ink: #111827;
            --muted: #4b5563;
            --line: #fde68a;
        }
        * { box-sizing: border-box; }
        html { scroll-behavior: smooth; }
        body {
            margin: 0;
            font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
            background: linear-gradient(135deg, #fde047 0%, #f9fafb 45%, rgba(0, 0, 0, 0.25) 100%);
            color: var(--ink);
            min-height: 100vh;
        }
        a { color: inherit; }
        .glass {
            background: rgba(255, 255, 255, 0.9);
            backdrop-filter: blur(12px);
            border: 1px solid var(--line);
            border-radius: 18px;
            box-shadow: 0 20px 40px rgba(17, 24, 39, 0.08);
        }
        .gradient-text {
            background: linear-gradient(90deg, #ca8a04, var(--amber-dark));
            -webkit-background-clip: text;
            background-clip: text;
            color: transparent;
        }
        .btn {
            display: inline-flex;
            align-items: center;
            justify-content: center;
            gap: 0.5rem;
            border-radius: 999px;
            border: none;
            padding: 0.9rem 1.8rem;
            font-size: 1rem;
            font-weight: 600;
            cursor: pointer;
            text-decoration: none;
            transition: transform 0.2s ease, box-shadow 0.2s ease;
        }
        .btn:hover { transform: scale(1.04); }
        .btn-primary {
            background: linear-gradient(90deg, var(--yellow), var(--amber));
            color: #fff;
        }
        .btn-outline {
            background: transparent;
            border: 2px solid var(--yellow);
            color: #374151;
        }
"#;

/// Wraps a page body in the shared document shell.
pub fn render_document(title: &str, styles: &str, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <meta name="description" content="{description}">
    <meta name="keywords" content="gig economy, Kenya, freelance, services, events, marketplace, professionals, short-term work">
    <link rel="canonical" href="{url}">
    <meta property="og:type" content="website">
    <meta property="og:site_name" content="{site}">
    <meta property="og:title" content="{title}">
    <meta property="og:url" content="{url}">
    <meta name="twitter:card" content="summary_large_image">
    <script src="https://unpkg.com/htmx.org@1.9.12"></script>
    <style>{base}{styles}</style>
</head>
<body>
{body}
</body>
</html>"##,
        title = escape(title),
        description = escape(SITE_DESCRIPTION),
        url = SITE_URL,
        site = SITE_NAME,
        base = BASE_STYLES,
        styles = styles,
        body = body,
    )
}
