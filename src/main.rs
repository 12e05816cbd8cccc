#[tokio::main]
async fn main() {
    if let Err(e) = i95d_lib::run().await {
        tracing::error!("{e}");
        eprintln!("i95d: {e}");
        std::process::exit(1);
    }
}
