//! Post-commit notification hook for new service requests.
//!
//! Invoked by the intake handler once the submission is durable. The hook
//! runs detached, so nothing that happens here can fail or delay the
//! client's response. Actual delivery (chat webhook, e-mail) is wired up on
//! the operations side; this records the event and the summary the channel
//! would carry.

use common::model::service_request::ServiceRequest;
use log::info;

pub fn service_request_created(request: &ServiceRequest) {
    let id = request.id;
    let full_name = request.full_name.clone();
    let services = request
        .services_needed
        .as_array()
        .map(|items| items.len())
        .unwrap_or(0);
    tokio::spawn(async move {
        info!(
            "service request #{} received from {} ({} services selected)",
            id, full_name, services
        );
    });
}
