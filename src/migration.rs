use crate::configuration::get_configuration;
use crate::database::{configure_database_using_sqlx, create_database};

#[tracing::instrument(name = "Default Migration")]
pub async fn run_migrations() {
    let configuration = get_configuration().expect("Failed to read configuration.");
    create_database(&configuration.database).await;
}

#[tracing::instrument(name = "Migrate using Sqlx")]
pub async fn migrate_using_sqlx() {
    let configuration = get_configuration().expect("Failed to read configuration.");
    configure_database_using_sqlx(&configuration.database).await;
}
