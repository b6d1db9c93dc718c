use std::sync::Arc;

use amity_service::AmityService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<AmityService>,
}
impl AppState {
	pub async fn new(config: amity_config::Config) -> color_eyre::Result<Self> {
		let service = AmityService::connect(config).await?;

		Ok(Self { service: Arc::new(service) })
	}
}
