// Entry point for `cargo run -p web-server`. The root binary's `serve` command does the same.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = configuration::load_settings(None)?;
    let _guard = configuration::init_tracing(&settings.logging)?;
    web_server::run_server(&settings).await
}
