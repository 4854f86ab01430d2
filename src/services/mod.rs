pub mod chat_client;
pub mod input_loop;
pub mod renderer;
pub mod session_store;
