#[actix_web::main]
async fn main() -> std::io::Result<()> {
    gestion_laboral_server::run().await
}
