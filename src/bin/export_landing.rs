use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tawala::web::{render_landing_page, LandingPageContext};

fn main() -> Result<()> {
    let html = render_landing_page(&LandingPageContext::default());
    let output_dir = Path::new("landing-page");
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    fs::write(output_dir.join("index.html"), html)?;
    println!("Wrote {}", output_dir.join("index.html").display());

    Ok(())
}
