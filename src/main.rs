#[tokio::main]
async fn main() -> std::io::Result<()> {
    stamp_arena::run_with_config().await
}
