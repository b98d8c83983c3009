use crate::ghlocal_api::ghlocal_client::GhLocalClient;
use crate::home_assistant::models::requests::delete_request::DeleteTimerOrAlarmRequest;
use crate::home_assistant::topics::Topics;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq)]
pub enum GhLocalCommand {
    Delete { id: String },
}

//ghlocal/<slug>/delete
pub fn command_topic_parser(topics: &Topics, topic: &str, payload: &str) -> Option<GhLocalCommand> {
    let parts: Vec<&str> = topic.split('/').collect();

    if payload.is_empty() {
        error!("Empty payload for topic: {:?}", topic);
        // No command
        return None;
    }

    match parts.as_slice() {
        [prefix, slug, "delete"] if *prefix == topics.topic_prefix() && *slug == topics.slug() => {
            match serde_json::from_str::<DeleteTimerOrAlarmRequest>(payload) {
                Ok(request) if !request.id.is_empty() => {
                    Some(GhLocalCommand::Delete { id: request.id })
                }
                _ => {
                    error!(
                        "Unable to deserialize payload: {:?} for topic: {:?}",
                        payload, topic
                    );
                    None
                }
            }
        }
        _ => None,
    }
}

#[derive(Clone)]
pub struct CommandProcessor {
    pub client: Arc<GhLocalClient>,
}

impl CommandProcessor {
    pub async fn process(&self, command: GhLocalCommand) {
        match command {
            GhLocalCommand::Delete { id } => {
                info!("Received delete request for {}", id);
                self.client.delete(&id).await;
            }
        }
    }
}
