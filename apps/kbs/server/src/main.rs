use eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    kbs_server::run().await
}
