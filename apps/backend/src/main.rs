#[tokio::main]
async fn main() -> anyhow::Result<()> {
    memodeck_backend::run().await
}
