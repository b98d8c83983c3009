pub mod alarms_response;
pub mod auth_response;
pub mod delete_response;
