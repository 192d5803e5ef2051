//! Web interface command.

use std::path::Path;
use std::sync::Arc;

use crate::app::{api, web};
use crate::domain::AppError;

pub fn run_serve(
    config_path: &Path,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), AppError> {
    let config = api::load(config_path)?;
    let host = host.unwrap_or_else(|| config.interface.server_name.clone());
    let port = port.unwrap_or(config.interface.server_port);

    // Blocking HTTP clients must be created and dropped outside the async runtime.
    let ctx = Arc::new(api::create_context(config)?);
    let agent = Arc::new(api::create_agent(ctx)?);

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let result = runtime.block_on(web::serve(Arc::clone(&agent), &host, port));
    drop(runtime);
    drop(agent);
    result
}
