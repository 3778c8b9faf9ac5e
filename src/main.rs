use resto_backoffice::configuration::get_configuration;
use resto_backoffice::startup::Application;
use resto_backoffice::telemetry::{get_subscriber, init_subscriber};
use resto_backoffice::utils::run_custom_commands;

#[actix_web::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("resto-backoffice".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        return run_custom_commands(args).await;
    }

    let configuration = get_configuration().expect("Failed to read configuration.");
    let application = Application::build(configuration).await?;
    application.run_until_stopped().await?;
    Ok(())
}
