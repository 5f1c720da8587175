use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use colored::*;
use tokio::sync::oneshot;

use crate::catalog::{self, PricingPlan};
use crate::checkout::{CheckoutState, PaymentMethod, PaymentOutcome, PaymentStatus};
use crate::config::{GatewayConfig, ServerConfig};
use crate::gateway::{run_payment_flow, FlowResult};
use crate::{logging, server};

const TAGLINE: &str = "Revolutionizing Kenya's gig economy";
const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// CLI STRUCTURE
// ============================================================================

#[derive(Parser)]
#[command(name = "tawala")]
#[command(version = VERSION)]
#[command(about = "Tawala landing page and subscription checkout", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server (default)
    Serve(ServerConfig),

    /// Print the subscription plans
    Plans,

    /// Run one simulated payment in the terminal
    #[command(visible_alias = "sim")]
    Simulate {
        /// Plan identifier (bronze, silver, gold)
        #[arg(short, long, default_value = "bronze")]
        plan: String,

        /// Payment method (mpesa, card)
        #[arg(short, long, default_value = "mpesa")]
        method: String,

        /// M-Pesa phone number
        #[arg(long, default_value = "")]
        phone: String,

        #[command(flatten)]
        gateway: GatewayConfig,
    },
}

/// `tawala` without a subcommand still honours the `TAWALA_*` environment.
#[derive(Parser)]
struct ServeDefaults {
    #[command(flatten)]
    config: ServerConfig,
}

pub struct TawalaCli;

impl TawalaCli {
    pub async fn run() -> anyhow::Result<()> {
        dotenvy::dotenv().ok();
        let cli = Cli::parse();
        logging::init(cli.verbose);

        match cli.command {
            None => server::serve(ServeDefaults::parse_from(["tawala"]).config).await,
            Some(Commands::Serve(config)) => server::serve(config).await,
            Some(Commands::Plans) => {
                print_plans(catalog::plans());
                Ok(())
            }
            Some(Commands::Simulate {
                plan,
                method,
                phone,
                gateway,
            }) => simulate(&plan, &method, &phone, &gateway).await,
        }
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

fn print_plans(plans: &[PricingPlan]) {
    println!("{} {}", "Tawala".bold().yellow(), format!("v{VERSION}").dimmed());
    println!("{}\n", TAGLINE.dimmed());
    for plan in plans {
        let name = if plan.popular {
            format!("{} {}", plan.name.bold(), "(most popular)".yellow())
        } else {
            plan.name.bold().to_string()
        };
        println!(
            "{:<30} {}{}",
            name,
            plan.display_price().green().bold(),
            plan.period.dimmed()
        );
        println!("  {}", plan.description.italic());
        for feature in plan.features {
            println!("  {} {}", "✓".green(), feature);
        }
        println!("  {} {}\n", "→".cyan(), plan.checkout_href().cyan());
    }
}

async fn simulate(
    plan_id: &str,
    method: &str,
    phone: &str,
    gateway: &GatewayConfig,
) -> anyhow::Result<()> {
    let Some(plan) = catalog::find_plan(plan_id) else {
        bail!("unknown plan `{plan_id}`");
    };
    let method: PaymentMethod = method.parse()?;
    let state = CheckoutState::new(Some(plan))
        .with_method(method)?
        .with_phone(phone)?;
    let (pending, request) = state
        .submit()
        .with_context(|| format!("cannot submit {} payment", method.label()))?;

    let gateway = gateway.build();
    println!(
        "{} {} {} via {}{}",
        "[*]".yellow(),
        "Charging".bold(),
        plan.amount_label().green(),
        method.label(),
        request
            .phone
            .as_deref()
            .map(|digits| format!(" ({})", crate::phone::format_phone_number(digits)))
            .unwrap_or_default()
    );
    println!(
        "{} waiting {:?} for the simulated gateway...",
        "[*]".yellow(),
        gateway.latency()
    );

    let (_cancel_tx, cancel_rx) = oneshot::channel();
    let outcome = match run_payment_flow(&gateway, request, cancel_rx).await {
        FlowResult::Completed(outcome) => outcome,
        FlowResult::Cancelled => bail!("payment was cancelled"),
    };
    let settled = pending.resolve(outcome.clone())?;

    match (settled.status(), outcome) {
        (PaymentStatus::Success, PaymentOutcome::Succeeded { transaction_id }) => {
            println!("{} {}", "[+]".green(), "Payment Successful!".green().bold());
            println!("    Plan:      {}", plan.name);
            println!("    Amount:    {}", plan.amount_label());
            println!("    Reference: {}", transaction_id);
        }
        (_, PaymentOutcome::Failed { reason }) => {
            println!("{} {}", "[-]".red(), "Payment Failed".red().bold());
            println!("    {}", reason);
        }
        (status, _) => println!("{} payment ended as {}", "[?]".yellow(), status),
    }
    Ok(())
}
