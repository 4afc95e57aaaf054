/// Coin identification module
///
/// This module handles:
/// - Preparing picked photos for upload and preview (capture.rs)
/// - Calling the AI vision service and extracting its verdict (client.rs)

pub mod capture;
pub mod client;
