// Requests
pub mod change_password_request;
pub mod create_task_request;
pub mod id_query;
pub mod login_request;
pub mod role_add_request;
pub mod role_edit_request;
pub mod task_list_query;
pub mod update_task_request;
pub mod user_add_request;
pub mod user_edit_request;
pub mod user_list_query;

// Responses
pub mod login_response;
pub mod role_get_response;
pub mod task_response;
pub mod task_stats_response;
pub mod user_detail_response;
pub mod user_get_response;
pub mod user_stats_response;

// Field helpers
pub mod due_date;
