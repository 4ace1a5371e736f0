use tracing::{debug, error, info, warn};

pub fn log_request_received(endpoint: &str, method: &str) {
    info!("Request received: {} {}", method, endpoint);
}

pub fn log_request_processed(endpoint: &str, status: u16, duration_ms: u64) {
    info!("Request processed: {} - Status: {} - Duration: {}ms",
          endpoint, status, duration_ms);
}

pub fn log_supabase_api_error(operation: &str, error: &str) {
    error!("Supabase API error: {} - Error: {}", operation, error);
}

pub fn log_ticket_created(ticket_id: &str, title: &str) {
    info!("Ticket created successfully: {} - Title: {}", ticket_id, title);
}

pub fn log_ticket_moved(ticket_id: &str, status_label: &str) {
    info!("Ticket {} movido para {}", ticket_id, status_label);
}

pub fn log_board_refreshed(count: usize) {
    debug!("Quadro atualizado: {} tickets no conjunto de trabalho", count);
}

pub fn log_config_loaded(env: &str) {
    info!("Configuration loaded successfully for environment: {}", env);
}

pub fn log_server_startup(port: u16) {
    info!("🚀 OPPTickets backend server starting on port {}", port);
}

pub fn log_server_ready(port: u16) {
    info!("✅ Server ready and listening on http://0.0.0.0:{}", port);
}

pub fn log_health_check() {
    debug!("Health check requested");
}

pub fn log_integration_status_check() {
    debug!("Integration status check requested");
}

pub fn log_validation_error(field: &str, message: &str) {
    warn!("Validation error: {} - {}", field, message);
}

pub fn log_info(message: &str) {
    info!("{}", message);
}

pub fn log_error(message: &str) {
    error!("{}", message);
}

pub fn log_warning(message: &str) {
    warn!("{}", message);
}
