// Gateway trait for device access
use crate::domain::command::CommandRequest;
use crate::domain::error::DashboardError;
use async_trait::async_trait;

#[async_trait]
pub trait DeviceGateway: Send + Sync {
    /// Issue one GET for `request` and return the body of a 2xx answer.
    /// Non-2xx answers are `DeviceRejected` carrying the device's body.
    async fn send(&self, request: &CommandRequest) -> Result<String, DashboardError>;
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers from a per-endpoint table and records every request it sees.
    #[derive(Default)]
    pub struct RecordingGateway {
        responses: Mutex<HashMap<String, Vec<Result<String, DashboardError>>>>,
        requests: Mutex<Vec<CommandRequest>>,
    }

    impl RecordingGateway {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue an answer; the last queued answer for an endpoint repeats.
        pub fn respond(self, endpoint: &str, response: Result<String, DashboardError>) -> Self {
            self.responses
                .lock()
                .unwrap()
                .entry(endpoint.to_string())
                .or_default()
                .push(response);
            self
        }

        pub fn ok(self, endpoint: &str, body: &str) -> Self {
            self.respond(endpoint, Ok(body.to_string()))
        }

        pub fn reject(self, endpoint: &str, status: u16, body: &str) -> Self {
            self.respond(
                endpoint,
                Err(DashboardError::DeviceRejected {
                    endpoint: endpoint.to_string(),
                    status,
                    body: body.to_string(),
                }),
            )
        }

        pub fn requests(&self) -> Vec<CommandRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DeviceGateway for RecordingGateway {
        async fn send(&self, request: &CommandRequest) -> Result<String, DashboardError> {
            self.requests.lock().unwrap().push(request.clone());
            let mut responses = self.responses.lock().unwrap();
            match responses.get_mut(&request.endpoint) {
                Some(queue) if queue.len() > 1 => queue.remove(0),
                Some(queue) if !queue.is_empty() => queue[0].clone(),
                _ => Err(DashboardError::SourceUnavailable {
                    endpoint: request.endpoint.clone(),
                    reason: "no response configured".to_string(),
                }),
            }
        }
    }
}
