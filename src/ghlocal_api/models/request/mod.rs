pub mod delete_request;
