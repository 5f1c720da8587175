use tawala::cli::TawalaCli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    TawalaCli::run().await
}
