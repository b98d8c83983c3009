pub mod cached_token_provider;
pub mod device_transport;
pub mod error;
pub mod ghlocal_client;
pub mod google_auth_client;
pub mod home_graph;
pub mod models;
pub mod normalizer;
pub mod token_provider;
