#[tokio::main]
async fn main() {
    limo_backend::run().await;
}
