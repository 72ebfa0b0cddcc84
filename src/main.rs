#[tokio::main]
async fn main() {
    pix_relay::run().await;
}
